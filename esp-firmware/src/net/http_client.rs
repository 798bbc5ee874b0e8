// HTTP-Client für den Task-Service
//
// Implementiert esp_core::TaskService über einen embassy-net TcpSocket.
// Pro Request eine neue Verbindung (Connection: close), Antwort bis EOF.
use defmt::{Debug2Format, warn};
use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::Duration;

use esp_core::protocol::{self, ResponseBuffer, SubmitBody};
use esp_core::{RemoteError, TaskService};

use crate::config::{
    HTTP_REQUEST_BUFFER_SIZE, HTTP_RESPONSE_BUFFER_SIZE, HTTP_TIMEOUT_SECS,
    JSON_BODY_BUFFER_SIZE, TCP_BUFFER_SIZE,
};
use crate::net::dns::resolve_ipv4;

/// Task-Service über HTTP/JSON
pub struct HttpTaskService {
    stack: &'static Stack<'static>,
    host: &'static str,
    port: u16,
}

impl HttpTaskService {
    pub fn new(stack: &'static Stack<'static>, host: &'static str, port: u16) -> Self {
        Self { stack, host, port }
    }

    /// Sendet `request` und liest die Antwort bis EOF in `response`
    ///
    /// Liefert die Anzahl gelesener Bytes.
    async fn exchange(&self, request: &[u8], response: &mut [u8]) -> Result<usize, RemoteError> {
        let ip = resolve_ipv4(self.stack, self.host).await.map_err(|e| {
            warn!("HTTP: DNS for '{}' failed: {}", self.host, e);
            RemoteError::Connectivity
        })?;

        let mut rx_buffer = [0u8; TCP_BUFFER_SIZE];
        let mut tx_buffer = [0u8; TCP_BUFFER_SIZE];
        let mut socket = TcpSocket::new(*self.stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)));

        socket.connect((ip, self.port)).await.map_err(|e| {
            warn!("HTTP: connect failed: {}", Debug2Format(&e));
            RemoteError::Connectivity
        })?;

        let mut written = 0;
        while written < request.len() {
            match socket.write(&request[written..]).await {
                Ok(0) | Err(_) => return Err(RemoteError::Connectivity),
                Ok(n) => written += n,
            }
        }
        socket
            .flush()
            .await
            .map_err(|_| RemoteError::Connectivity)?;

        let mut received = ResponseBuffer::new(response);
        loop {
            match socket.read(received.spare()).await {
                Ok(0) => break,
                Ok(n) => {
                    if let Err(e) = received.commit(n) {
                        // Antwort passt nicht in den Buffer
                        warn!("HTTP: response exceeds {} bytes", HTTP_RESPONSE_BUFFER_SIZE);
                        socket.abort();
                        return Err(e);
                    }
                }
                Err(e) => {
                    warn!("HTTP: read failed: {}", Debug2Format(&e));
                    return Err(RemoteError::Connectivity);
                }
            }
        }

        socket.close();
        Ok(received.len())
    }
}

impl TaskService for HttpTaskService {
    async fn fetch_status(&mut self, device_id: &str) -> Result<bool, RemoteError> {
        let mut request = heapless::String::<HTTP_REQUEST_BUFFER_SIZE>::new();
        protocol::write_fetch_request(&mut request, self.host, device_id)
            .map_err(|_| RemoteError::Protocol)?;

        let mut response = [0u8; HTTP_RESPONSE_BUFFER_SIZE];
        let len = self.exchange(request.as_bytes(), &mut response).await?;
        let parsed = protocol::parse_response(&response[..len])?;
        protocol::parse_status_body(parsed.body)
    }

    async fn submit_status(
        &mut self,
        device_id: &str,
        target_done: bool,
        timestamp: Option<&str>,
    ) -> Result<(), RemoteError> {
        let body = SubmitBody {
            device_id,
            status: target_done,
            timestamp,
        };
        let mut body_buffer = [0u8; JSON_BODY_BUFFER_SIZE];
        let body_len = protocol::encode_submit_body(&body, &mut body_buffer)?;
        let body_str =
            core::str::from_utf8(&body_buffer[..body_len]).map_err(|_| RemoteError::Protocol)?;

        let mut request = heapless::String::<HTTP_REQUEST_BUFFER_SIZE>::new();
        protocol::write_submit_request(&mut request, self.host, body_str)
            .map_err(|_| RemoteError::Protocol)?;

        let mut response = [0u8; HTTP_RESPONSE_BUFFER_SIZE];
        let len = self.exchange(request.as_bytes(), &mut response).await?;
        protocol::parse_response(&response[..len])?;
        Ok(())
    }
}
