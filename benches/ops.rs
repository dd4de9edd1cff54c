// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use svcgraph::model::{
    Connection, ConnectionId, Graph, GraphSnapshot, ServiceId, ServiceKind, ServiceNode,
};
use svcgraph::ops::{apply_ops, ApplyResult, GraphOp};

// Benchmark identity (keep stable):
// - Group names in this file: `ops.apply`, `ops.cascade`
// - Case IDs (the string after the `/`) must remain stable so results stay comparable.
fn checksum_apply_result(result: &ApplyResult) -> u64 {
    let mut acc = 0u64;
    acc = acc.wrapping_mul(131).wrapping_add(result.applied as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.added.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.updated.len() as u64);
    acc = acc
        .wrapping_mul(131)
        .wrapping_add(result.delta.removed.len() as u64);
    acc
}

fn sid(idx: usize) -> ServiceId {
    ServiceId::new(format!("svc-{idx:05}")).expect("service id")
}

fn service(idx: usize) -> ServiceNode {
    let kind = ServiceKind::DISPLAY_ORDER[idx % ServiceKind::DISPLAY_ORDER.len()];
    ServiceNode::new(sid(idx), format!("Service {idx}"), kind, "#6366f1")
}

/// `services` nodes; node 0 is a hub connected to every other node, plus a chain between
/// neighbours.
fn hub_graph(services: usize) -> Graph {
    let mut connections = Vec::new();
    for idx in 1..services {
        connections.push(Connection::new(
            ConnectionId::new(format!("hub-{idx:05}")).expect("connection id"),
            sid(0),
            sid(idx),
        ));
        if idx + 1 < services {
            connections.push(Connection::new(
                ConnectionId::new(format!("chain-{idx:05}")).expect("connection id"),
                sid(idx),
                sid(idx + 1),
            ));
        }
    }

    Graph::from_snapshot(GraphSnapshot {
        services: (0..services).map(service).collect(),
        connections,
    })
    .expect("bench graph is valid")
}

fn add_service_ops(base: usize, count: usize) -> Vec<GraphOp> {
    (0..count)
        .map(|idx| GraphOp::AddService {
            service: service(base + idx),
        })
        .collect()
}

fn add_connection_ops(services: usize, count: usize) -> Vec<GraphOp> {
    (0..count)
        .map(|idx| {
            let source = (idx.wrapping_mul(7) % (services - 1)) + 1;
            let mut target = (idx.wrapping_mul(7).wrapping_add(3) % (services - 1)) + 1;
            if target == source {
                target = (target % (services - 1)) + 1;
            }
            GraphOp::AddConnection {
                connection: Connection::new(
                    ConnectionId::new(format!("bench-conn-{idx:06}")).expect("connection id"),
                    sid(source),
                    sid(target),
                )
                .with_label(format!("bench_conn_{idx:06}")),
            }
        })
        .collect()
}

fn bench_case(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    name: &str,
    template: &Graph,
    ops: Vec<GraphOp>,
) {
    group.throughput(Throughput::Elements(ops.len() as u64));
    group.bench_function(name, {
        let template = template.clone();
        move |b| {
            b.iter_batched(
                || template.clone(),
                |mut graph| {
                    let result = apply_ops(&mut graph, black_box(&ops)).expect("apply_ops");
                    black_box(checksum_apply_result(&result))
                },
                BatchSize::SmallInput,
            )
        }
    });
}

fn benches_ops(c: &mut Criterion) {
    const SERVICES: usize = 200;
    let template = hub_graph(SERVICES);

    let mut group = c.benchmark_group("ops.apply");
    bench_case(&mut group, "add_service_single", &template, add_service_ops(SERVICES, 1));
    bench_case(&mut group, "add_service_batch_10", &template, add_service_ops(SERVICES, 10));
    bench_case(&mut group, "add_service_batch_200", &template, add_service_ops(SERVICES, 200));
    bench_case(&mut group, "add_connection_batch_10", &template, add_connection_ops(SERVICES, 10));
    bench_case(
        &mut group,
        "add_connection_batch_200",
        &template,
        add_connection_ops(SERVICES, 200),
    );
    group.finish();

    let mut group = c.benchmark_group("ops.cascade");
    bench_case(
        &mut group,
        "remove_leaf",
        &template,
        vec![GraphOp::RemoveService {
            service_id: sid(SERVICES - 1),
        }],
    );
    bench_case(
        &mut group,
        "remove_hub",
        &template,
        vec![GraphOp::RemoveService { service_id: sid(0) }],
    );
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = benches_ops
}
criterion_main!(benches);
