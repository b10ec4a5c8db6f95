//! Recovery from a surface that fails partway through a pass

use anyhow::{bail, Result};
use circles::core::{
    AsciiSurface, CircleTemplate, Color, DrawingSurface, Font, NodeHandle, Point, Shape, Size,
};
use circles::live::{LiveConfig, LiveDiagram, TextBuffer};
use circles::machine::{LayoutConfig, SceneAdapter, TransitionParser};

/// ASCII surface whose next `create_text` can be made to fail
#[derive(Default)]
struct FlakySurface {
    inner: AsciiSurface,
    fail_next_text: bool,
}

impl DrawingSurface for FlakySurface {
    fn root(&self) -> NodeHandle {
        self.inner.root()
    }

    fn create_group(&mut self) -> NodeHandle {
        self.inner.create_group()
    }

    fn create_node(&mut self, shape: Shape) -> NodeHandle {
        self.inner.create_node(shape)
    }

    fn create_text(&mut self, label: &str, font: &Font, color: Color) -> Result<NodeHandle> {
        if std::mem::take(&mut self.fail_next_text) {
            bail!("text layer unavailable");
        }
        self.inner.create_text(label, font, color)
    }

    fn measure(&self, text: NodeHandle) -> Result<f64> {
        self.inner.measure(text)
    }

    fn add_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.inner.add_child(parent, child)
    }

    fn remove_child(&mut self, parent: NodeHandle, child: NodeHandle) -> Result<()> {
        self.inner.remove_child(parent, child)
    }

    fn set_position(&mut self, node: NodeHandle, position: Point) -> Result<()> {
        self.inner.set_position(node, position)
    }

    fn set_circle_template(&mut self, template: CircleTemplate) {
        self.inner.set_circle_template(template)
    }

    fn canvas_size(&self) -> Size {
        self.inner.canvas_size()
    }

    fn clear(&mut self) {
        self.inner.clear()
    }

    fn update(&mut self) -> Result<()> {
        self.inner.update()
    }
}

fn root_children(scene: &SceneAdapter<FlakySurface>) -> usize {
    let surface = &scene.surface().inner;
    surface.children(surface.root()).unwrap().len()
}

#[test]
fn test_failed_pass_keeps_surviving_nodes() {
    let parser = TransitionParser::new();
    let mut scene = SceneAdapter::new(FlakySurface::default(), LayoutConfig::default()).unwrap();
    scene.render(&parser.parse_text("A->B")).unwrap();
    let a = scene.node("A").unwrap().handle;
    let b = scene.node("B").unwrap().handle;

    scene.surface_mut().fail_next_text = true;
    let edited = parser.parse_text("A->B\nB->C");
    assert!(scene.render(&edited).is_err());
    assert_eq!(scene.nodes().len(), 2);
    assert_eq!(scene.node("A").unwrap().handle, a);

    let stats = scene.render(&edited).unwrap();
    assert_eq!(stats.created, 1);
    assert_eq!(scene.node("A").unwrap().handle, a);
    assert_eq!(scene.node("B").unwrap().handle, b);
    // Arrow layer plus one group per state, no duplicates
    assert_eq!(root_children(&scene), 4);
}

#[test]
fn test_failed_replacement_is_retried() {
    let parser = TransitionParser::new();
    let mut scene = SceneAdapter::new(FlakySurface::default(), LayoutConfig::default()).unwrap();
    scene.render(&parser.parse_text("A->B")).unwrap();

    // C fails first; A and B stay until the retry succeeds
    scene.surface_mut().fail_next_text = true;
    let edited = parser.parse_text("C->D");
    assert!(scene.render(&edited).is_err());
    assert!(scene.node("A").is_some());

    let stats = scene.render(&edited).unwrap();
    assert_eq!((stats.created, stats.destroyed), (2, 2));
    assert_eq!(root_children(&scene), 3);
}

#[test]
fn test_live_update_retries_after_failure() {
    let mut diagram = LiveDiagram::new(FlakySurface::default(), LiveConfig::default()).unwrap();
    diagram.bind_input(TextBuffer::new("A->B")).unwrap();
    let a = diagram.scene().node("A").unwrap().handle;

    diagram.input_mut().unwrap().set("A->B\nB->C");
    diagram.surface_mut().fail_next_text = true;
    assert!(diagram.update().is_err());

    // Same text again is not skipped, since the failed pass never finished
    assert!(diagram.update().unwrap());
    assert_eq!(diagram.scene().node("A").unwrap().handle, a);
    assert_eq!(diagram.scene().nodes().len(), 3);
}
