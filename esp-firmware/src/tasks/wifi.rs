// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};

use crate::config::{WIFI_PASSWORD, WIFI_RETRY_SECS, WIFI_SSID};
use crate::net::is_network_ready;

/// WiFi Connection Task
///
/// Verbindet mit dem Access Point und reconnected nach jedem Verbindungsabbruch.
/// Solange keine Verbindung besteht, bleibt die State Machine in `Initializing`
/// bzw. läuft in den Setup-Timeout.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            // Configure WiFi station mode
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Connect to AP
        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_SECS)).await;
                continue;
            }
        }

        // Wait for disconnect
        info!("WiFi: Waiting for disconnect event...");
        controller
            .wait_for_event(esp_radio::wifi::WifiEvent::StaDisconnected)
            .await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(WIFI_RETRY_SECS)).await;
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Loggt jeden Wechsel der Netzwerk-Bereitschaft (Link + IPv4).
/// Die Control-Loop fragt den Zustand selbst pro Tick ab.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    let mut was_ready = false;

    loop {
        let ready = is_network_ready(stack);
        if ready != was_ready {
            match stack.config_v4() {
                Some(config) if ready => {
                    info!("WiFi: Got IP address!");
                    info!("  IP:      {}", Debug2Format(&config.address.address()));
                    info!("  Gateway: {}", Debug2Format(&config.gateway));
                    info!("  DNS:     {}", Debug2Format(&config.dns_servers));
                }
                _ => warn!("WiFi: Network lost, waiting for link and DHCP..."),
            }
            was_ready = ready;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
