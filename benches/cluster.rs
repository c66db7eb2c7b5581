use std::{collections::HashMap, time::Duration};

use criterion::{
    BenchmarkGroup, Criterion, SamplingMode, criterion_group, criterion_main, measurement::WallTime,
};
use kafka_cluster_meta::{Cluster, Node, PartitionInfo, TopicPartition};

const N_NODES: i32 = 30;
const N_TOPICS: i32 = 200;
const N_PARTITIONS: i32 = 32;

fn nodes() -> Vec<Node> {
    (0..N_NODES)
        .map(|id| Node::new(id, format!("broker-{id}"), 9092))
        .collect()
}

fn partitions(nodes: &[Node]) -> Vec<PartitionInfo> {
    let mut out = vec![];
    for t in 0..N_TOPICS {
        for p in 0..N_PARTITIONS {
            let replicas: Vec<_> = (0..3)
                .map(|r| nodes[((t + p + r) % N_NODES) as usize].clone())
                .collect();
            out.push(PartitionInfo::new(
                format!("topic-{t}"),
                p,
                Some(replicas[0].clone()),
                replicas.clone(),
                replicas,
            ));
        }
    }
    out
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let nodes = nodes();
    let partitions = partitions(&nodes);
    let cluster = Cluster::builder()
        .nodes(nodes.clone())
        .partitions(partitions.clone())
        .build();

    {
        let mut group = benchmark_group(c, "build");

        group.bench_function("builder", |b| {
            b.iter(|| {
                Cluster::builder()
                    .nodes(nodes.clone())
                    .partitions(partitions.clone())
                    .build()
            })
        });

        group.bench_function("with_partitions", |b| {
            let p = PartitionInfo::new("topic-0", 0, None, vec![], vec![]);
            let delta = HashMap::from([(p.topic_partition(), p)]);
            b.iter(|| cluster.with_partitions(delta.clone()))
        });

        group.finish();
    }

    {
        let mut group = benchmark_group(c, "query");
        let tp = TopicPartition::new("topic-17", 5);

        group.bench_function("leader_for", |b| b.iter(|| cluster.leader_for(&tp)));
        group.bench_function("available_partitions_for_topic", |b| {
            b.iter(|| cluster.available_partitions_for_topic("topic-17"))
        });

        group.finish();
    }

    {
        let mut group = benchmark_group(c, "mutate");

        group.bench_function("add_remove_partition", |b| {
            let cluster = Cluster::builder()
                .nodes(nodes.clone())
                .partitions(partitions.clone())
                .build();
            let p = PartitionInfo::new("new-topic", 0, Some(nodes[0].clone()), vec![], vec![]);
            b.iter(|| {
                cluster.add_partition(p.clone()).ok();
                cluster.remove_partition("new-topic", 0);
            })
        });

        group.finish();
    }
}

fn benchmark_group<'a>(c: &'a mut Criterion, name: &str) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);
    group.sampling_mode(SamplingMode::Flat);
    group
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
