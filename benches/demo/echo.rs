use criterion::{BenchmarkId, Criterion, Throughput};
use dotenvy::dotenv;
use libcellular::demo::config::EchoConfig;
use libcellular::demo::echo::EchoTest;
use libcellular::network::error::Error;
use libcellular::network::sockets::StdSockets;
use libcellular::network::transport::NetworkContext;
use libcellular::network::{SocketStatus, Sockets, TransportInterface};
use std::env;
use std::net::UdpSocket;
use std::thread;
use std::time::Duration;

/// Echoes the last datagram straight back, without touching the OS.
struct Mirror {
    last: Vec<u8>,
}

impl TransportInterface for Mirror {
    fn send(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.last.clear();
        self.last.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn recv(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let n = self.last.len().min(buf.len());
        buf[..n].copy_from_slice(&self.last[..n]);
        Ok(n)
    }
}

/// Same as [`Mirror`], one layer down.
struct MirrorSockets {
    last: Vec<u8>,
}

impl Sockets for MirrorSockets {
    type Socket = ();

    fn udp_connect(&mut self, _: &str, _: u16, _: u32, _: u32) -> Result<(), SocketStatus> {
        Ok(())
    }

    fn disconnect(&mut self, _: ()) {}

    fn send(&mut self, _: &mut (), buf: &[u8]) -> Result<usize, SocketStatus> {
        self.last.clear();
        self.last.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn recv(&mut self, _: &mut (), buf: &mut [u8]) -> Result<usize, SocketStatus> {
        let n = self.last.len().min(buf.len());
        buf[..n].copy_from_slice(&self.last[..n]);
        Ok(n)
    }
}

fn config_up_to(max: usize) -> EchoConfig {
    EchoConfig {
        buffer_max_size: max,
        ..EchoConfig::default()
    }
}

fn bytes_in_run(config: &EchoConfig) -> u64 {
    (config.first_packet_size..=config.buffer_max_size).sum::<usize>() as u64
}

pub fn bench_echo_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("echo_loop");
    for max in [64usize, 512, 1460] {
        let config = config_up_to(max);
        group.throughput(Throughput::Bytes(bytes_in_run(&config)));
        group.bench_with_input(BenchmarkId::from_parameter(max), &config, |b, config| {
            let mut test = EchoTest::<1460>::new();
            let mut mirror = Mirror {
                last: Vec::with_capacity(1460),
            };
            b.iter(|| {
                test.loop_send_and_receive(&mut mirror, config)
                    .expect("Echo loop failed")
            })
        });
    }
    group.finish();
}

pub fn bench_transport_send_recv(c: &mut Criterion) {
    let mut group = c.benchmark_group("transport_send_recv");
    let payload = [0x5Au8; 1460];
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("send_recv_1460", |b| {
        let mut context = NetworkContext::new(MirrorSockets {
            last: Vec::with_capacity(1460),
        });
        context
            .connect("bench.local", 9000, 0, 0)
            .expect("Failed to connect");
        let mut buf = [0u8; 1460];
        b.iter(|| {
            context.send(&payload).expect("Failed to send");
            context.recv(&mut buf).expect("Failed to receive")
        })
    });
    group.finish();
}

/// Starts a local echo server unless `TEST_ECHO_ADDRESS` names a remote one.
fn echo_target() -> (String, u16) {
    dotenv().ok();
    if let Ok(address) = env::var("TEST_ECHO_ADDRESS") {
        if let Some((host, port)) = address.rsplit_once(':') {
            if let Ok(port) = port.parse() {
                return (host.to_string(), port);
            }
        }
    }

    let server = UdpSocket::bind("127.0.0.1:0").expect("Failed to bind echo server");
    let port = server.local_addr().expect("No local address").port();
    thread::spawn(move || {
        let mut buf = [0u8; 2048];
        while let Ok((n, peer)) = server.recv_from(&mut buf) {
            let _ = server.send_to(&buf[..n], peer);
        }
    });
    ("127.0.0.1".to_string(), port)
}

pub fn bench_udp_echo(c: &mut Criterion) {
    let (host, port) = echo_target();
    let mut group = c.benchmark_group("udp_echo");
    group.measurement_time(Duration::from_secs(10));
    let mut config = config_up_to(256);
    config.endpoint.clear();
    config
        .endpoint
        .push_str(&host)
        .expect("Host name too long");
    config.port = port;
    config.send_recv_timeout_ms = 1000;
    group.throughput(Throughput::Bytes(bytes_in_run(&config)));

    group.bench_function("udp_echo_256", |b| {
        let mut test = EchoTest::<256>::new();
        b.iter_batched_ref(
            || NetworkContext::new(StdSockets),
            |context| test.run(context, &config).expect("Echo run failed"),
            criterion::BatchSize::SmallInput,
        )
    });
    group.finish();
}
