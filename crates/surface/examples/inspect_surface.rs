//! Surface inspection example - committing trees and querying them

use dom::serializer::node_path_string;
use dom::{parse_tree_str, DomEngine, InstanceHandle, RevisionProvider, RevisionSerializer};
use std::sync::Arc;
use surface::{HostValue, NativeDom, PointerCaptureRegistry, SurfaceRegistry};

const FIRST_COMMIT: &str = r#"{
    "id": 1, "name": "RootView", "traits": ["root", "layoutable"],
    "layout": { "frame": [0, 0, 360, 640] },
    "children": [
        {
            "id": 2, "name": "ScrollView", "instanceHandle": 2,
            "layout": { "frame": [0, 40, 360, 600] },
            "scroll": { "offset": [0, 120], "contentSize": [360, 2000] },
            "children": [
                {
                    "id": 3, "name": "Text", "instanceHandle": 3,
                    "layout": { "frame": [16, 200, 328, 24] },
                    "children": [{ "id": 4, "text": "Hello from surface 11" }]
                }
            ]
        }
    ]
}"#;

const SECOND_COMMIT: &str = r#"{
    "id": 1, "name": "RootView", "traits": ["root", "layoutable"],
    "layout": { "frame": [0, 0, 360, 640] },
    "children": [
        { "id": 2, "name": "ScrollView", "instanceHandle": 2, "layout": { "frame": [0, 40, 360, 600] } }
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let registry = Arc::new(SurfaceRegistry::new());
    let mut event_rx = registry.event_bus().subscribe();

    registry.start_surface(11, parse_tree_str(11, FIRST_COMMIT)?)?;
    let native = NativeDom::new(
        DomEngine::new(registry.clone()),
        PointerCaptureRegistry::new(),
    );
    native.link_root_node(11, InstanceHandle::new(11, 1));

    if let Some(revision) = registry.current_revision(11) {
        println!("{}", RevisionSerializer::new().serialize(&revision));
        println!("text path: {:?}", node_path_string(&revision, 3));
    }

    // Walk down from the document the way the runtime would
    let root = native.child_nodes(&HostValue::Number(11.0))?;
    let scroll_view = native.child_nodes(&HostValue::Handle(root[0]))?;
    let text = native.child_nodes(&HostValue::Handle(scroll_view[0]))?;
    let text = HostValue::Handle(text[0]);
    println!("tag: {}", native.tag_name(&text)?);
    println!("text: {:?}", native.text_content(&text)?);
    println!("client rect: {:?}", native.bounding_client_rect(&text, true)?);
    native.measure(&text, |x, y, width, height, page_x, page_y| {
        println!("measure: ({x}, {y}, {width}, {height}) page ({page_x}, {page_y})");
    })?;
    println!("parent: {:?}", native.parent_node(&text)?);

    // The text node is gone from the next commit
    registry.commit(11, parse_tree_str(11, SECOND_COMMIT)?)?;
    println!("connected after commit: {}", native.is_connected(&text)?);
    println!("client rect after commit: {:?}", native.bounding_client_rect(&text, true)?);

    registry.stop_surface(11)?;
    println!("document connected after stop: {}", native.is_connected(&HostValue::Number(11.0))?);

    while let Ok(event) = event_rx.try_recv() {
        println!("Event: {:?}", event);
    }

    Ok(())
}
