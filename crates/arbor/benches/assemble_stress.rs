use arbor::render::{Dom, KeyDown, MindMap, MindMapOptions, find_ele, render_document};
use arbor::{Document, Node};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const BASIC: &str = include_str!("../../../fixtures/mindmap/basic.json");

fn balanced(depth: usize, fanout: usize, id: &mut usize) -> Node {
    *id += 1;
    let mut node = Node::new(format!("n{id}"), format!("Topic {id}"));
    if depth > 0 {
        let children: Vec<Node> = (0..fanout).map(|_| balanced(depth - 1, fanout, id)).collect();
        node = node.with_children(children);
    }
    node
}

fn bench_assemble_stress(c: &mut Criterion) {
    let mut next = 0usize;
    let tree = Document::from_root(balanced(5, 4, &mut next));
    let basic = Document::from_json(BASIC).expect("fixture");

    let mut group = c.benchmark_group("assemble_stress");
    group.sample_size(50);

    group.bench_function("balanced_tree_render", |b| {
        b.iter(|| {
            let rendered = render_document(black_box(&tree), MindMapOptions::default())
                .expect("render");
            black_box(rendered.map.topic_count());
        });
    });

    // Small documents are µs-scale, so batch to get a stable signal.
    group.bench_function("basic_render_html_x50", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for _ in 0..50usize {
                let rendered = render_document(black_box(&basic), MindMapOptions::default())
                    .expect("render");
                acc ^= rendered.html().len();
            }
            black_box(acc);
        });
    });

    group.bench_function("edit_commit_cycle", |b| {
        let mut dom = Dom::new();
        let body = dom.body();
        let mut map = MindMap::mount(&mut dom, body, MindMapOptions::default());
        let mut doc = basic.clone();
        map.render(&mut dom, &doc).expect("render");
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let el = find_ele(&dom, "g1", Some(&map));
            map.begin_edit(&mut dom, &mut doc, el);
            map.input_text(&mut dom, if flip { "Ship 1.1" } else { "Ship 1.0" });
            black_box(map.edit_keydown(&mut dom, &mut doc, &KeyDown::new("Enter")));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_assemble_stress);
criterion_main!(benches);
