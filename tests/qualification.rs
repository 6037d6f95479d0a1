mod common;

use std::net::UdpSocket;
use std::time::Duration;

use common::MockSockets;
use libcellular::demo::config::EchoConfig;
use libcellular::demo::echo::run_echo_task;
use libcellular::demo::qualification::*;
use libcellular::network::error::Error;
use libcellular::network::sockets::StdSockets;

const HOST: TestHostInfo<'static> = TestHostInfo {
    host_name: "echo.example.com",
    port: 9000,
};

/// Minimal stand-in for the external harness: connect, echo one packet over
/// the transport interface, disconnect.
#[derive(Default)]
struct EchoOnce {
    steps: Vec<&'static str>,
}

impl QualificationRunner<MockSockets> for EchoOnce {
    type Report = Result<(), &'static str>;

    fn run(&mut self, param: &mut TransportTestParam<MockSockets>) -> Self::Report {
        if !(param.network_connect)(&mut param.network_context, &HOST).is_success() {
            return Err("connect");
        }
        self.steps.push("connect");

        let transport = param.transport();
        if transport.send(b"qualification") != Ok(13) {
            return Err("send");
        }
        self.steps.push("send");

        let mut buf = [0u8; 32];
        if transport.recv(&mut buf) != Ok(13) || &buf[..13] != b"qualification" {
            return Err("recv");
        }
        self.steps.push("recv");

        (param.network_disconnect)(&mut param.network_context);
        self.steps.push("disconnect");
        Ok(())
    }
}

#[test]
fn runner_receives_configured_transport() {
    let mut param = setup_transport_test_param(MockSockets::echo(), MockSockets::echo());
    let mut runner = EchoOnce::default();

    assert_eq!(run_transport_test_task(&mut runner, &mut param), Ok(()));
    assert_eq!(runner.steps, ["connect", "send", "recv", "disconnect"]);
    assert!(!param.network_context.is_connected());
    assert_eq!(param.network_context.sockets().disconnects, 1);
}

#[test]
fn connect_hook_uses_fixed_timeouts() {
    let mut param = setup_transport_test_param(MockSockets::echo(), MockSockets::echo());
    let status = (param.network_connect)(&mut param.network_context, &HOST);

    assert_eq!(status, NetworkConnectStatus::Success);
    assert_eq!(
        param.network_context.sockets().last_host,
        Some((
            "echo.example.com".to_string(),
            9000,
            QUALIFICATION_TIMEOUT_MS,
            QUALIFICATION_TIMEOUT_MS
        ))
    );
}

#[test]
fn connect_hook_maps_failures() {
    let mut sockets = MockSockets::echo();
    sockets.connect_status = Some(-1);
    let mut param = setup_transport_test_param(sockets, MockSockets::echo());
    assert_eq!(
        (param.network_connect)(&mut param.network_context, &HOST),
        NetworkConnectStatus::Failure
    );

    let empty = TestHostInfo {
        host_name: "",
        port: 9000,
    };
    assert_eq!(
        network_connect(&mut param.second_network_context, &empty),
        NetworkConnectStatus::Failure
    );
    assert_eq!(param.second_network_context.sockets().connects, 0);
}

#[test]
fn disconnect_hook_ignores_status() {
    let mut param = setup_transport_test_param(MockSockets::echo(), MockSockets::echo());
    // Not connected: the status is swallowed.
    (param.network_disconnect)(&mut param.network_context);
    assert_eq!(param.network_context.sockets().disconnects, 0);
}

#[test]
fn second_context_is_independent() {
    let mut param = setup_transport_test_param(MockSockets::echo(), MockSockets::echo());
    (param.network_connect)(&mut param.second_network_context, &HOST);

    assert!(param.second_network_context.is_connected());
    assert!(!param.network_context.is_connected());
    // The transport interface is bound to the first context only.
    assert_eq!(param.transport().send(b"x"), Err(Error::InvalidParameter));
}

#[test]
fn host_platform_runs_worker_tasks() {
    let server = UdpSocket::bind("127.0.0.1:0").unwrap();
    server
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    let port = server.local_addr().unwrap().port();

    let platform = HostPlatform;
    let echo_server = platform
        .thread_create(
            |socket: UdpSocket| {
                let mut buf = [0u8; 256];
                while let Ok((n, peer)) = socket.recv_from(&mut buf) {
                    socket.send_to(&buf[..n], peer).unwrap();
                }
            },
            server,
        )
        .unwrap();

    let json = format!(
        r#"{{"endpoint":"127.0.0.1","port":{},"buffer_max_size":32,"send_recv_timeout_ms":1000}}"#,
        port
    );
    let config = EchoConfig::from_json(json.as_bytes()).unwrap();
    let client = platform
        .thread_create(
            |config: EchoConfig| {
                assert_eq!(run_echo_task(StdSockets, &config).unwrap().last_size, 32);
            },
            config,
        )
        .unwrap();

    platform.thread_timed_join(client, 5_000).unwrap();
    platform.time_delay(10);
    platform.thread_timed_join(echo_server, 5_000).unwrap();
}
