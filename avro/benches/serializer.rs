// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use apache_avro::types::Value;
use callgraph_avro::{AvroSerializer, Callgraph, Node, Relation, Serializer};
use criterion::{Criterion, criterion_group, criterion_main};
use std::{hint::black_box, time::Duration};

fn make_graph(count: i32) -> Callgraph {
    Callgraph {
        nodes: (0..count)
            .map(|id| Node {
                package: "io.example.service".to_string(),
                method: format!("handle{id}"),
                id,
                params: "java.lang.String,int".to_string(),
                class: format!("Handler{}", id % 17),
                kind: if id % 5 == 0 { "test" } else { "source" }.to_string(),
                calls_reflection: id % 11 == 0,
                file: format!("Handler{}.java", id % 17),
                always_run: false,
            })
            .collect(),
        test_relations: (0..count)
            .step_by(5)
            .map(|source| Relation {
                source,
                tests: (1..5).map(|t| source + t).collect(),
            })
            .collect(),
        vis_relations: vec![],
    }
}

fn make_value(serializer: &AvroSerializer, count: i32) -> Value {
    let bytes = make_graph(count)
        .to_avro(serializer)
        .expect("graph encodes");
    serializer.deserialize(&bytes).expect("graph decodes")
}

fn bench_serialize_value(c: &mut Criterion, count: i32, name: &str) {
    let serializer = AvroSerializer::new("callgraph").expect("callgraph schema");
    let value = make_value(&serializer, count);
    c.bench_function(name, |b| {
        b.iter(|| serializer.serialize(black_box(value.clone())))
    });
}

fn bench_serialize_typed(c: &mut Criterion, count: i32, name: &str) {
    let serializer = AvroSerializer::new("callgraph").expect("callgraph schema");
    let graph = make_graph(count);
    c.bench_function(name, |b| b.iter(|| black_box(&graph).to_avro(&serializer)));
}

fn bench_deserialize(c: &mut Criterion, count: i32, name: &str) {
    let serializer = AvroSerializer::new("callgraph").expect("callgraph schema");
    let bytes = make_graph(count)
        .to_avro(&serializer)
        .expect("graph encodes");
    c.bench_function(name, |b| b.iter(|| serializer.deserialize(black_box(&bytes))));
}

fn bench_construct(c: &mut Criterion) {
    c.bench_function("construct callgraph serializer", |b| {
        b.iter(|| AvroSerializer::new(black_box("callgraph")))
    });
}

fn bench_small_graph(c: &mut Criterion) {
    bench_serialize_value(c, 10, "serialize value 10 nodes");
    bench_serialize_typed(c, 10, "serialize typed 10 nodes");
    bench_deserialize(c, 10, "deserialize 10 nodes");
}

fn bench_big_graph(c: &mut Criterion) {
    bench_serialize_value(c, 10_000, "serialize value 10_000 nodes");
    bench_serialize_typed(c, 10_000, "serialize typed 10_000 nodes");
    bench_deserialize(c, 10_000, "deserialize 10_000 nodes");
}

criterion_group!(benches, bench_construct, bench_small_graph);

criterion_group!(
    name = long_benches;
    config = Criterion::default().sample_size(20).measurement_time(Duration::from_secs(10));
    targets = bench_big_graph
);

criterion_main!(benches, long_benches);
