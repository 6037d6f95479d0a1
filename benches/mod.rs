use criterion::{criterion_group, criterion_main};

mod demo;

criterion_group!(
    benches,
    demo::echo::bench_echo_loop,
    demo::echo::bench_transport_send_recv,
    demo::echo::bench_udp_echo
);
criterion_main!(benches);
