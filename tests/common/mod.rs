#![allow(dead_code)]

use std::collections::VecDeque;

use libcellular::network::{SocketStatus, Sockets};

/// Replies produced for one sent datagram.
pub type Replies = Vec<Vec<u8>>;

/// Decides what the simulated echo server sends back for the `n`th datagram.
pub type Responder = Box<dyn FnMut(usize, &[u8]) -> Replies>;

/// In-memory stand-in for the modem's sockets library.
///
/// Every sent datagram is handed to the responder and whatever it returns is
/// queued for `recv`. An empty queue reads as a timeout (zero bytes).
pub struct MockSockets {
    pub connect_status: Option<SocketStatus>,
    pub send_shortfall: usize,
    pub recv_errors: VecDeque<SocketStatus>,
    pub responder: Responder,
    pub pending: VecDeque<Vec<u8>>,
    pub sent_sizes: Vec<usize>,
    pub connects: usize,
    pub disconnects: usize,
    pub last_host: Option<(String, u16, u32, u32)>,
    next_socket: u32,
}

impl MockSockets {
    pub fn new(responder: Responder) -> Self {
        Self {
            connect_status: None,
            send_shortfall: 0,
            recv_errors: VecDeque::new(),
            responder,
            pending: VecDeque::new(),
            sent_sizes: Vec::new(),
            connects: 0,
            disconnects: 0,
            last_host: None,
            next_socket: 0,
        }
    }

    /// A server that echoes every datagram once.
    pub fn echo() -> Self {
        Self::new(Box::new(|_: usize, data: &[u8]| vec![data.to_vec()]))
    }

    /// A server that never answers.
    pub fn silent() -> Self {
        Self::new(Box::new(|_: usize, _: &[u8]| Replies::new()))
    }

    pub fn sends_of(&self, size: usize) -> usize {
        self.sent_sizes.iter().filter(|&&s| s == size).count()
    }
}

impl Sockets for MockSockets {
    type Socket = u32;

    fn udp_connect(
        &mut self,
        host_name: &str,
        port: u16,
        receive_timeout_ms: u32,
        send_timeout_ms: u32,
    ) -> Result<u32, SocketStatus> {
        self.connects += 1;
        self.last_host = Some((
            host_name.to_string(),
            port,
            receive_timeout_ms,
            send_timeout_ms,
        ));
        if let Some(status) = self.connect_status {
            return Err(status);
        }
        self.next_socket += 1;
        Ok(self.next_socket)
    }

    fn disconnect(&mut self, _socket: u32) {
        self.disconnects += 1;
        self.pending.clear();
    }

    fn send(&mut self, _socket: &mut u32, buf: &[u8]) -> Result<usize, SocketStatus> {
        let index = self.sent_sizes.len();
        self.sent_sizes.push(buf.len());
        let replies = (self.responder)(index, buf);
        self.pending.extend(replies);
        Ok(buf.len().saturating_sub(self.send_shortfall))
    }

    fn recv(&mut self, _socket: &mut u32, buf: &mut [u8]) -> Result<usize, SocketStatus> {
        if let Some(status) = self.recv_errors.pop_front() {
            return Err(status);
        }
        match self.pending.pop_front() {
            Some(datagram) => {
                // Datagram semantics: excess bytes are discarded.
                let n = datagram.len().min(buf.len());
                buf[..n].copy_from_slice(&datagram[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }
}
