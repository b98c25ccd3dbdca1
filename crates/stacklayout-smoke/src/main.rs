//! Stack layout smoke harness
//!
//! Loads a JSON tree description (or a built-in dashboard sample), runs the
//! layout engine and prints the resulting id -> rectangle map as JSON. Every
//! render callback is logged; `RUST_LOG=stacklayout_smoke=debug` shows the
//! visiting order.

use std::collections::BTreeMap;
use std::process::ExitCode;

use stacklayout::{LayoutEngine, LayoutOptions, LayoutTree, NodeId, Rect};
use tracing::{debug, error, info};

const SAMPLE_TREE: &str = r#"{
    "column": {
        "id": "dashboard",
        "padding": 8,
        "rows": [
            {
                "id": "header",
                "height": 32,
                "justification": "CENTER",
                "columns": [
                    { "id": "title", "width": 240, "height": 32 }
                ]
            },
            {
                "id": "body",
                "height": 200,
                "margin": { "top": 8 },
                "columns": [
                    {
                        "id": "legend",
                        "width": 120,
                        "rowTemplate": { "id": "entry", "height": 18, "margin": { "bottom": 4 } },
                        "numRows": 5
                    },
                    { "id": "plot", "evenlyFillAvailableWidth": true, "height": 100, "heightUnit": "PERCENT" },
                    { "id": "axis", "width": 10, "widthUnit": "PERCENT", "height": 200 }
                ]
            },
            {
                "id": "footer",
                "evenlyFillAvailableWidth": true,
                "height": 20,
                "columnTemplate": { "id": "tick", "height": 20 },
                "numColumns": 6
            }
        ]
    }
}"#;

/// Parse command line arguments
struct Args {
    tree_file: Option<String>,
    width: Option<f32>,
    height: Option<f32>,
    max_depth: Option<usize>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut tree_file = None;
        let mut width = None;
        let mut height = None;
        let mut max_depth = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--tree-file" => {
                    tree_file = args.next();
                }
                "--width" => {
                    width = args.next().and_then(|val| val.parse().ok());
                }
                "--height" => {
                    height = args.next().and_then(|val| val.parse().ok());
                }
                "--max-depth" => {
                    max_depth = args.next().and_then(|val| val.parse().ok());
                }
                _ => {}
            }
        }

        Self {
            tree_file,
            width,
            height,
            max_depth,
        }
    }

    /// Load the tree description from file or use the built-in sample
    fn load_tree_json(&self) -> String {
        if let Some(ref path) = self.tree_file {
            match std::fs::read_to_string(path) {
                Ok(content) => return content,
                Err(e) => {
                    error!(path = %path, error = %e, "Failed to read tree file, using sample");
                }
            }
        }
        SAMPLE_TREE.to_string()
    }

    fn options(&self) -> LayoutOptions {
        match self.max_depth {
            Some(max_depth) => LayoutOptions::new().with_max_depth(max_depth),
            None => LayoutOptions::default(),
        }
    }
}

fn run(args: &Args) -> stacklayout::Result<BTreeMap<String, Rect>> {
    let (tree, root) = LayoutTree::from_json(&args.load_tree_json())?;
    let engine = LayoutEngine::with_options(args.options());

    let mut on_render = |node: NodeId, rect: Rect, index: usize| {
        debug!(
            node = node.index(),
            index,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "render"
        );
    };

    let measurements = engine.measure(&tree, root)?;
    let bounds = measurements.bounding_size(root)?;
    let rect = Rect::new(
        0.0,
        0.0,
        args.width.unwrap_or(bounds.width),
        args.height.unwrap_or(bounds.height),
    );
    info!(
        nodes = tree.len(),
        bounding_width = bounds.width,
        bounding_height = bounds.height,
        width = rect.width,
        height = rect.height,
        "Laying out tree"
    );

    let rects = engine.place(&tree, &measurements, root, rect, &mut on_render)?;
    Ok(rects.into_iter().collect())
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!(
        tree_file = ?args.tree_file,
        width = ?args.width,
        height = ?args.height,
        max_depth = ?args.max_depth,
        "Starting stack layout smoke harness"
    );

    let rects = match run(&args) {
        Ok(rects) => rects,
        Err(e) => {
            error!(error = %e, "Layout failed");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&rects) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Failed to serialize layout");
            ExitCode::FAILURE
        }
    }
}
