use std::hint::black_box;
use std::rc::Rc;

use criterion::{criterion_group, criterion_main, Criterion};
use routeway::navigation::resolve_path;
use routeway::router::{create_branches, get_route_matches, Outlet, RouteDefinition};

fn zoo() -> Vec<Rc<RouteDefinition>> {
    let animals = RouteDefinition::new("/zoo/animals").children([
        RouteDefinition::new("/"),
        RouteDefinition::new("/:id").children([
            RouteDefinition::new("/"),
            RouteDefinition::new("/toys/:toy_id?"),
            RouteDefinition::new("/habitats/:habitat_id/sections/:section_id"),
        ]),
    ]);
    vec![
        RouteDefinition::new("/"),
        animals,
        RouteDefinition::with_paths(["/zoo/health", "/zoo/status"]),
        RouteDefinition::new("/zoo/:category/*rest"),
        RouteDefinition::new("/*"),
    ]
    .into_iter()
    .map(Rc::new)
    .collect()
}

fn bench_compile(c: &mut Criterion) {
    let definitions = zoo();
    let outlet: Outlet = Rc::new(|_| None);
    c.bench_function("compile_branches", |b| {
        b.iter(|| create_branches(black_box(&definitions), "", &outlet).unwrap())
    });
}

fn bench_match(c: &mut Criterion) {
    let outlet: Outlet = Rc::new(|_| None);
    let branches = create_branches(&zoo(), "", &outlet).unwrap();
    let paths = [
        "/",
        "/zoo/animals",
        "/zoo/animals/12/toys/3",
        "/zoo/animals/12/habitats/4/sections/9",
        "/zoo/birds/anything/else",
        "/nowhere",
    ];
    c.bench_function("match_paths", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(get_route_matches(&branches, black_box(path)));
            }
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    c.bench_function("resolve_relative", |b| {
        b.iter(|| resolve_path(black_box("/app"), black_box("../toys/3?x=1"), Some("/app/zoo/animals/12")))
    });
}

criterion_group!(benches, bench_compile, bench_match, bench_resolve);
criterion_main!(benches);
