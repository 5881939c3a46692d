use arbor_core::{Document, Node, NodeData};
use arbor_render::assemble::{CHILDREN_TAG, PARENT_TAG, WRAPPER_TAG};
use arbor_render::expander::EXPANDER_TAG;
use arbor_render::topic::TOPIC_TAG;
use arbor_render::{
    ChildrenLayout, Dom, DomId, ElementFactory, Expander, MindMap, MindMapOptions, Result,
    SequentialLayout, ShapeWarning, Topic, find_ele,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn fixture(name: &str) -> Document {
    let path = workspace_root().join("fixtures").join("mindmap").join(name);
    let text = std::fs::read_to_string(&path).expect("fixture");
    Document::from_json(&text).expect("valid document")
}

fn mounted() -> (Dom, MindMap) {
    let mut dom = Dom::new();
    let body = dom.body();
    let map = MindMap::mount(&mut dom, body, MindMapOptions::default());
    (dom, map)
}

fn parts(dom: &Dom, wrapper: DomId) -> (DomId, Option<DomId>) {
    let kids = dom.child_elements(wrapper);
    (kids[0], kids.get(1).copied())
}

#[test]
fn fixture_renders_expected_shape() {
    let (mut dom, mut map) = mounted();
    let doc = fixture("basic.json");
    let out = map.render(&mut dom, &doc).expect("render ok");

    assert_eq!(dom.tag(out.wrapper), Some(WRAPPER_TAG));
    let (top, children) = parts(&dom, out.wrapper);
    assert_eq!(dom.tag(top), Some(PARENT_TAG));
    let children = children.expect("root is expanded");
    assert_eq!(dom.tag(children), Some(CHILDREN_TAG));
    assert_eq!(dom.child_elements(children).len(), 3);

    // collapsed node: expander present, no children aggregator, child not rendered
    let risks = find_ele(&dom, "risks", Some(&map)).expect("risks rendered");
    let risks_parent = dom.parent(risks).unwrap();
    let expander = dom.child_elements(risks_parent)[1];
    assert_eq!(dom.tag(expander), Some(EXPANDER_TAG));
    assert_eq!(Expander::is_expanded(&dom, expander), Some(false));
    assert_eq!(dom.child_elements(dom.parent(risks_parent).unwrap()).len(), 1);
    assert!(find_ele(&dom, "r1", Some(&map)).is_none());

    // leaf: no expander
    let logo = find_ele(&dom, "logo", Some(&map)).unwrap();
    let logo_parent = dom.parent(logo).unwrap();
    assert_eq!(dom.child_elements(logo_parent), vec![logo]);
    assert!(map.topic(logo).unwrap().image().is_some());

    assert_eq!(map.topic_count(), 6);
    assert!(map.take_warnings().is_empty());
}

#[test]
fn html_output_is_stable_across_renders() {
    let (mut dom, mut map) = mounted();
    let doc = fixture("basic.json");
    map.render(&mut dom, &doc).unwrap();
    let first = dom.inner_html(map.canvas());
    map.render(&mut dom, &doc).unwrap();
    assert_eq!(dom.inner_html(map.canvas()), first);
    assert!(first.starts_with("<me-wrapper class=\"me-root\">"));
    assert!(first.contains("data-nodeid=\"megoals\""));
    assert!(first.contains("<a class=\"hyper-link\""));
}

#[test]
fn malformed_image_does_not_stop_siblings() {
    let (mut dom, mut map) = mounted();
    let doc = fixture("malformed_image.json");
    map.render(&mut dom, &doc).unwrap();

    let pic = find_ele(&dom, "pic", Some(&map)).unwrap();
    assert!(map.topic(pic).unwrap().image().is_none());
    assert_eq!(dom.text_content(pic), "Broken picture");
    assert!(find_ele(&dom, "ok", Some(&map)).is_some());
    assert_eq!(
        map.take_warnings(),
        vec![ShapeWarning::IncompleteImage {
            node_id: "pic".to_string()
        }]
    );
}

#[test]
fn every_wrapper_matches_its_node() {
    let (mut dom, mut map) = mounted();
    let doc = Document::from_root(
        Node::new("r", "R").with_children((0..4).map(|i| {
            Node::new(format!("c{i}"), format!("C{i}"))
                .with_expanded(if i % 2 == 0 { None } else { Some(false) })
                .with_children((0..i).map(move |j| Node::new(format!("c{i}-{j}"), "leaf")))
        })),
    );
    map.render(&mut dom, &doc).unwrap();

    for (key, node) in doc.iter() {
        let Some(el) = find_ele(&dom, &node.id, Some(&map)) else {
            let parent = doc.parent(key).and_then(|p| doc.get(p)).unwrap();
            assert!(!parent.is_expanded(), "{} should be rendered", node.id);
            continue;
        };
        let top = dom.parent(el).unwrap();
        let wrapper = dom.parent(top).unwrap();
        let has_children = !doc.children(key).is_empty();
        let has_expander = dom
            .child_elements(top)
            .iter()
            .any(|c| Expander::is_expander(&dom, *c));
        assert_eq!(has_expander, has_children, "expander for {}", node.id);
        let (_, aggregated) = parts(&dom, wrapper);
        match aggregated {
            Some(agg) => {
                assert!(has_children && node.is_expanded());
                assert_eq!(dom.child_elements(agg).len(), doc.children(key).len());
            }
            None => assert!(!has_children || !node.is_expanded()),
        }
    }
}

struct BadgeFactory;

impl ElementFactory for BadgeFactory {
    fn create_topic(&self, dom: &mut Dom, options: &MindMapOptions, node: &NodeData) -> Topic {
        let topic = arbor_render::create_topic(dom, options, node);
        dom.add_class(topic.el, "badge");
        topic
    }
}

#[derive(Default)]
struct CountingLayout(AtomicUsize);

impl ChildrenLayout for CountingLayout {
    fn layout_children(
        &self,
        dom: &mut Dom,
        doc: &Document,
        map: &mut MindMap,
        children: &[arbor_core::NodeKey],
    ) -> Result<DomId> {
        self.0.fetch_add(1, Ordering::SeqCst);
        SequentialLayout.layout_children(dom, doc, map, children)
    }
}

#[test]
fn instance_collaborators_are_used() {
    let mut dom = Dom::new();
    let body = dom.body();
    let layout = Arc::new(CountingLayout::default());
    let mut map = MindMap::mount(&mut dom, body, MindMapOptions::default())
        .with_factory(Arc::new(BadgeFactory))
        .with_layout(layout.clone());
    let doc = fixture("basic.json");
    map.render(&mut dom, &doc).unwrap();

    // root and goals are expanded parents; risks is collapsed
    assert_eq!(layout.0.load(Ordering::SeqCst), 2);
    let badges = dom.query_all_by_class(map.container(), "badge");
    assert_eq!(badges.len(), map.topic_count());
    assert!(badges.iter().all(|b| dom.tag(*b) == Some(TOPIC_TAG)));
}

#[test]
fn two_instances_share_one_dom() {
    let mut dom = Dom::new();
    let body = dom.body();
    let mut a = MindMap::mount(&mut dom, body, MindMapOptions::default());
    let mut b = MindMap::mount(
        &mut dom,
        body,
        MindMapOptions {
            draggable: false,
            ..Default::default()
        },
    );
    let doc = fixture("basic.json");
    a.render(&mut dom, &doc).unwrap();
    b.render(&mut dom, &doc).unwrap();

    let in_a = find_ele(&dom, "goals", Some(&a)).unwrap();
    let in_b = find_ele(&dom, "goals", Some(&b)).unwrap();
    assert_ne!(in_a, in_b);
    assert_eq!(dom.attr(in_a, "draggable"), Some("true"));
    assert_eq!(dom.attr(in_b, "draggable"), Some("false"));
    assert!(a.topic(in_b).is_none());
}
