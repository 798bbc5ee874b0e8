// SNTP Task - synchronisiert die Wall-Clock
//
// Nach erfolgreicher Synchronisation wird ein ClockAnchor abgelegt,
// der monotone Zeit (embassy_time::Instant) auf Unix-Zeit abbildet.
// Vor der ersten Synchronisation gibt es keine Wall-Clock (kein Reset-Trigger,
// kein Zeitstempel im Submit).

use core::cell::Cell;

use defmt::{Debug2Format, info, warn};
use embassy_net::Stack;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};
use embassy_time::{Duration, Instant, Timer, with_timeout};

use esp_core::ClockAnchor;
use esp_core::clock::{SNTP_PACKET_SIZE, SntpError, WallClock, parse_sntp_response, sntp_request};

use crate::config::{
    NTP_PORT, NTP_SERVER, SNTP_LOCAL_PORT, SNTP_RESYNC_SECS, SNTP_RETRY_SECS, SNTP_TIMEOUT_SECS,
};
use crate::net::{resolve_ipv4, wait_for_network};

/// Letzte erfolgreiche Synchronisation
static CLOCK_ANCHOR: Mutex<CriticalSectionRawMutex, Cell<Option<ClockAnchor>>> =
    Mutex::new(Cell::new(None));

/// Unix-Zeit (UTC) zum monotonen Zeitpunkt `mono_ms`, `None` vor der ersten Synchronisation
pub fn unix_now(mono_ms: u64) -> Option<u64> {
    CLOCK_ANCHOR
        .lock(|anchor| anchor.get())
        .map(|anchor| anchor.unix_at(mono_ms))
}

/// SNTP Fehler-Typen
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
enum TimeSyncError {
    DnsFailed,
    SocketError,
    Timeout,
    InvalidResponse(SntpError),
}

/// SNTP Task
///
/// - Wartet auf Netzwerk
/// - Synchronisiert beim Start und danach alle 15 Minuten
/// - Bei Fehlern erneuter Versuch nach kurzer Wartezeit
#[embassy_executor::task]
pub async fn time_sync_task(stack: &'static Stack<'static>) {
    info!("SNTP: Task started, waiting for network...");
    wait_for_network(stack).await;

    loop {
        match sync_once(stack).await {
            Ok(unix_secs) => {
                let anchor = ClockAnchor {
                    unix_secs,
                    mono_ms: Instant::now().as_millis(),
                };
                CLOCK_ANCHOR.lock(|cell| cell.set(Some(anchor)));
                info!(
                    "SNTP: Time synced: {}",
                    WallClock::from_unix_secs(unix_secs).iso8601().as_str()
                );
                Timer::after(Duration::from_secs(SNTP_RESYNC_SECS)).await;
            }
            Err(e) => {
                warn!("SNTP: Sync failed: {}, retrying in {}s", e, SNTP_RETRY_SECS);
                Timer::after(Duration::from_secs(SNTP_RETRY_SECS)).await;
            }
        }
    }
}

/// Ein SNTP-Roundtrip: Request senden, Antwort auswerten
async fn sync_once(stack: &'static Stack<'static>) -> Result<u64, TimeSyncError> {
    let server = resolve_ipv4(stack, NTP_SERVER)
        .await
        .map_err(|_| TimeSyncError::DnsFailed)?;

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0u8; 128];
    let mut tx_buffer = [0u8; 128];
    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(SNTP_LOCAL_PORT).map_err(|e| {
        warn!("SNTP: bind failed: {}", Debug2Format(&e));
        TimeSyncError::SocketError
    })?;

    socket
        .send_to(&sntp_request(), (server, NTP_PORT))
        .await
        .map_err(|_| TimeSyncError::SocketError)?;

    let mut packet = [0u8; SNTP_PACKET_SIZE];
    let (len, _) = with_timeout(
        Duration::from_secs(SNTP_TIMEOUT_SECS),
        socket.recv_from(&mut packet),
    )
    .await
    .map_err(|_| TimeSyncError::Timeout)?
    .map_err(|_| TimeSyncError::SocketError)?;

    parse_sntp_response(&packet[..len]).map_err(TimeSyncError::InvalidResponse)
}
