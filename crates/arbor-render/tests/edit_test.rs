use arbor_core::{Document, Node};
use arbor_render::{
    Dom, EdgeLinker, EditOutcome, KeyDown, MindMap, MindMapOptions, Operation, find_ele,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

#[derive(Default)]
struct CountingLinker(AtomicUsize);

impl EdgeLinker for CountingLinker {
    fn link(&self, _dom: &mut Dom, _map: &MindMap) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Session {
    dom: Dom,
    doc: Document,
    map: MindMap,
    linker: Arc<CountingLinker>,
    ops: mpsc::Receiver<Operation>,
}

fn session(topic: &str) -> Session {
    let mut dom = Dom::new();
    let body = dom.body();
    let (tx, ops) = mpsc::channel();
    let linker = Arc::new(CountingLinker::default());
    let mut map = MindMap::mount(&mut dom, body, MindMapOptions::default())
        .with_sink(tx)
        .with_linker(linker.clone());
    let doc = Document::from_root(
        Node::new("root", "Root").with_children([Node::new("n", topic), Node::new("m", "M")]),
    );
    map.render(&mut dom, &doc).expect("render ok");
    Session {
        dom,
        doc,
        map,
        linker,
        ops,
    }
}

fn start(s: &mut Session, id: &str) {
    let el = find_ele(&s.dom, id, Some(&s.map));
    s.map.begin_edit(&mut s.dom, &mut s.doc, el).expect("edit started");
}

#[test]
fn untouched_edit_round_trips() {
    let mut s = session("Hello");
    start(&mut s, "n");
    let outcome = s.map.blur_edit(&mut s.dom, &mut s.doc);

    assert_eq!(outcome, Some(EditOutcome::Unchanged));
    assert_eq!(s.doc.by_id("n").unwrap().topic, "Hello");
    let ops: Vec<Operation> = s.ops.try_iter().collect();
    assert_eq!(
        ops,
        vec![Operation::BeginEdit {
            node_id: "n".to_string()
        }]
    );
    // only the initial render linked
    assert_eq!(s.linker.0.load(Ordering::SeqCst), 1);
}

#[test]
fn edited_text_is_trimmed_committed_and_announced() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "  World  ");
    s.map.blur_edit(&mut s.dom, &mut s.doc);

    assert_eq!(s.doc.by_id("n").unwrap().topic, "World");
    let el = find_ele(&s.dom, "n", Some(&s.map)).unwrap();
    assert_eq!(s.dom.text_content(el), "World");
    assert_eq!(s.linker.0.load(Ordering::SeqCst), 2);

    let finish = s.ops.try_iter().last().unwrap();
    assert_eq!(finish.name(), "finishEdit");
    assert_eq!(
        serde_json::to_value(&finish).unwrap(),
        serde_json::json!({
            "name": "finishEdit",
            "nodeId": "n",
            "topic": "World",
            "origin": "Hello"
        })
    );
}

#[test]
fn clearing_the_text_commits_empty() {
    let mut s = session("X");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "");
    s.map.blur_edit(&mut s.dom, &mut s.doc);
    assert_eq!(s.doc.by_id("n").unwrap().topic, "");
    let tree = s.doc.to_tree(s.doc.root()).unwrap();
    assert_eq!(tree.children[0].data.topic, "");
}

#[test]
fn tab_moves_focus_to_the_canvas_and_commits() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "Tabbed");
    let key = s
        .map
        .edit_keydown(&mut s.dom, &mut s.doc, &KeyDown::new("Tab"));
    assert!(key.prevent_default);
    assert_eq!(s.dom.focused(), Some(s.map.canvas()));
    assert_eq!(s.doc.by_id("n").unwrap().topic, "Tabbed");
}

#[test]
fn focusing_elsewhere_commits() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "Elsewhere");
    let other = find_ele(&s.dom, "m", Some(&s.map)).unwrap();
    let outcome = s.map.focus(&mut s.dom, &mut s.doc, other);
    assert!(matches!(outcome, Some(EditOutcome::Changed { .. })));
    assert_eq!(s.dom.focused(), Some(other));
    assert!(s.map.editing().is_none());
}

#[test]
fn refresh_after_edit_keeps_committed_text() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "Again");
    s.map.blur_edit(&mut s.dom, &mut s.doc);
    s.map.refresh_topic(&mut s.dom, &s.doc, "n").unwrap();
    let el = find_ele(&s.dom, "n", Some(&s.map)).unwrap();
    assert_eq!(s.dom.text_content(el), "Again");
}

#[test]
fn full_render_moves_the_open_edit_to_the_new_topic() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "World");
    let surface = s.map.editing().unwrap().surface();
    s.map.render(&mut s.dom, &s.doc).expect("render ok");

    let el = find_ele(&s.dom, "n", Some(&s.map)).unwrap();
    let live = s.map.editing().expect("still editing");
    assert_eq!(live.topic(), el);
    assert_eq!(s.dom.parent(surface), Some(el));
    assert_eq!(s.dom.focused(), Some(surface));
    assert_eq!(s.dom.text_content(surface), "World");

    s.map.blur_edit(&mut s.dom, &mut s.doc);
    assert_eq!(s.doc.by_id("n").unwrap().topic, "World");
    assert_eq!(s.dom.text_content(el), "World");
    assert!(!s.dom.is_live(surface));
}

#[test]
fn refreshing_the_edited_topic_keeps_the_surface() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "Typed");
    let surface = s.map.editing().unwrap().surface();
    let n = s.doc.key_of("n").unwrap();
    s.doc.get_mut(n).unwrap().tags = vec!["t".to_string()];
    s.map.refresh_topic(&mut s.dom, &s.doc, "n").unwrap();

    let el = find_ele(&s.dom, "n", Some(&s.map)).unwrap();
    assert!(s.dom.is_attached(surface));
    assert_eq!(s.dom.parent(surface), Some(el));
    assert_eq!(s.dom.focused(), Some(surface));
    assert_eq!(s.dom.text_content(surface), "Typed");

    s.map.blur_edit(&mut s.dom, &mut s.doc);
    assert_eq!(s.doc.by_id("n").unwrap().topic, "Typed");
    let first = s.dom.first_child(el).unwrap();
    assert_eq!(s.dom.text_content(first), "Typed");
}

#[test]
fn reshaping_the_edited_node_keeps_the_surface() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "Reshaped");
    let surface = s.map.editing().unwrap().surface();
    let n = s.doc.key_of("n").unwrap();
    let out = s
        .map
        .reshape_parent(&mut s.dom, &s.doc, n)
        .expect("reshape ok")
        .expect("n is rendered");

    assert_eq!(s.dom.parent(surface), Some(out.topic));
    assert_eq!(s.map.editing().unwrap().topic(), out.topic);
    s.map.blur_edit(&mut s.dom, &mut s.doc);
    assert_eq!(s.dom.text_content(out.topic), "Reshaped");
}

#[test]
fn edit_outlives_its_topic_and_still_commits() {
    let mut s = session("Hello");
    start(&mut s, "n");
    s.map.input_text(&mut s.dom, "Kept");
    let surface = s.map.editing().unwrap().surface();
    let other = Document::from_root(Node::new("root", "Root"));
    s.map.render(&mut s.dom, &other).expect("render ok");

    assert!(s.map.editing().is_some());
    assert!(!s.dom.is_attached(surface));
    let outcome = s.map.blur_edit(&mut s.dom, &mut s.doc);
    assert!(matches!(outcome, Some(EditOutcome::Changed { .. })));
    assert_eq!(s.doc.by_id("n").unwrap().topic, "Kept");
    assert!(find_ele(&s.dom, "n", Some(&s.map)).is_none());
}
