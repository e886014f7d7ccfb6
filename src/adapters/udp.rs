//! UDP transport adapter.

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use log::info;

use crate::error::TransportError;
use crate::server::transport::Transport;

pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind `addr:port`.  The receive timeout bounds how long the request
    /// loop can go without checking its control flags.
    pub fn bind(addr: &str, port: u16, recv_timeout: Duration) -> Result<Self, TransportError> {
        let endpoint = format!("{addr}:{port}");
        let bind_err = |source| TransportError::Bind {
            addr: endpoint.clone(),
            source,
        };
        let socket = UdpSocket::bind((addr, port)).map_err(bind_err)?;
        socket.set_read_timeout(Some(recv_timeout)).map_err(bind_err)?;
        info!("udp: bound {}", socket.local_addr().map_err(bind_err)?);
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }
}

impl Transport for UdpTransport {
    type Peer = SocketAddr;

    fn recv(&mut self, buf: &mut [u8]) -> Result<Option<(usize, SocketAddr)>, TransportError> {
        match self.socket.recv_from(buf) {
            Ok((n, peer)) => Ok(Some((n, peer))),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(TransportError::Recv(e)),
        }
    }

    fn send(&mut self, data: &[u8], peer: SocketAddr) -> Result<(), TransportError> {
        let sent = self.socket.send_to(data, peer).map_err(TransportError::Send)?;
        if sent == data.len() {
            Ok(())
        } else {
            Err(TransportError::Send(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short datagram: {sent} of {} bytes", data.len()),
            )))
        }
    }

    fn describe(&self) -> String {
        self.local_addr()
            .map_or_else(|_| "udp (unknown address)".into(), |a| format!("udp {a}"))
    }
}
