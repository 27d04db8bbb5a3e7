//! Report and query benchmarks. Run with: cargo bench --bench report_bench
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use std::time::Duration;
use warden_core::command::{transition, Command};
use warden_core::models::{GrantRequest, NewUser};
use warden_core::query::GrantFilter;
use warden_core::store::EntityStore;

/// Built-in registry plus `users` generated users, each granted a level on
/// every application.
fn populated(users: usize) -> EntityStore {
    let mut store = EntityStore::builtin().expect("builtin dataset");
    let apps: Vec<_> = store
        .applications()
        .iter()
        .map(|app| (app.id.clone(), app.access_level_ids()))
        .collect();
    for i in 0..users {
        let user = store
            .create_user(NewUser { name: Name().fake(), email: SafeEmail().fake(), role: "Engineer".into(), department: None, is_active: true })
            .expect("valid user");
        for (app_id, levels) in &apps {
            let level = levels[i % levels.len()].clone();
            store.grant_access(GrantRequest::new(user.id.clone(), app_id.clone(), level)).expect("valid grant");
        }
    }
    store
}

fn bench_reports(c: &mut Criterion) {
    let mut g = c.benchmark_group("access_report"); g.measurement_time(Duration::from_secs(5));
    for &n in &[100usize, 1_000, 5_000] {
        let store = populated(n);
        g.throughput(Throughput::Elements(store.user_access().len() as u64));
        g.bench_with_input(BenchmarkId::new("generate", n), &store, |b, s| { b.iter(|| black_box(s.query().generate_access_report(&"5".into()))); });
        g.bench_with_input(BenchmarkId::new("export", n), &store, |b, s| {
            let report = s.query().generate_access_report(&"4".into()).expect("report");
            b.iter(|| black_box(serde_json::to_string(&report.to_export())));
        });
    }
    g.finish();
}

fn bench_projections(c: &mut Criterion) {
    let mut g = c.benchmark_group("projections"); g.measurement_time(Duration::from_secs(5));
    let store = populated(1_000);
    g.bench_function("users_for_application", |b| { b.iter(|| black_box(store.query().users_for_application(&"1".into()).len())); });
    g.bench_function("applications_for_user", |b| { b.iter(|| black_box(store.query().applications_for_user(&"500".into()).len())); });
    g.bench_function("list_grants_filtered", |b| { let f = GrantFilter::new().application("3"); b.iter(|| black_box(store.query().list_grants(&f).len())); });
    g.bench_function("dashboard_stats", |b| { b.iter(|| black_box(store.query().dashboard_stats(5))); });
    g.bench_function("effective_permissions", |b| { b.iter(|| black_box(store.query().effective_permissions(&"1".into(), &"5".into()).map(|p| p.len()))); });
    g.finish();
}

fn bench_commands(c: &mut Criterion) {
    let mut g = c.benchmark_group("commands");
    let store = populated(1_000);
    g.bench_function("grant_transition", |b| { b.iter(|| black_box(transition(&store, Command::GrantAccess(GrantRequest::new("1", "1", "1"))).is_ok())); });
    g.bench_function("delete_user_cascade", |b| { b.iter(|| black_box(transition(&store, Command::DeleteUser { id: "1".into() }).is_ok())); });
    g.finish();
}

criterion_group!(benches, bench_reports, bench_projections, bench_commands);
criterion_main!(benches);
