// Build-Script für den Task-Button
// Backt WLAN-, Service- und SNTP-Einstellungen ein und setzt die Linker-Skripte

/// Pflichtwerte: ohne sie schlägt `env!` in config.rs fehl
const REQUIRED: [&str; 4] = ["WIFI_SSID", "WIFI_PASSWORD", "SERVICE_HOST", "DEVICE_ID"];

/// Optional, Defaults stehen in config.rs
const OPTIONAL: [&str; 2] = ["SERVICE_PORT", "NTP_SERVER"];

fn main() {
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=.env nicht gelesen ({e}), Werte kommen aus der Umgebung");
    }
    println!("cargo:rerun-if-changed=.env");

    for key in REQUIRED.iter().chain(OPTIONAL.iter()) {
        match std::env::var(key) {
            Ok(value) => println!("cargo:rustc-env={key}={value}"),
            Err(_) if REQUIRED.contains(key) => {
                println!("cargo:warning={key} fehlt, in .env oder als Umgebungsvariable setzen");
            }
            Err(_) => {}
        }
        println!("cargo:rerun-if-env-changed={key}");
    }

    link_hints();

    // defmt-Symbole für die Log-Ausgabe über espflash
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    // Speicher-Layout des ESP32-C6, muss das letzte Skript sein
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Übersetzt fehlende Symbole in Hinweise zur Firmware-Konfiguration
///
/// Der Linker ruft dieses Build-Script als `--error-handling-script` erneut auf,
/// dann mit Fehlerart und Symbolname als Argumenten.
fn link_hints() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, symbol, ..] = args.as_slice() {
        if kind == "undefined-symbol" {
            let hint = match symbol.as_str() {
                s if s.starts_with("_defmt_") => Some(
                    "defmt-Symbole fehlen: `esp-println` mit Feature `defmt-espflash` einbinden und `defmt.x` linken",
                ),
                "_stack_start" => Some("`linkall.x` fehlt in den Linker-Argumenten"),
                s if s.starts_with("esp_rtos_") => Some(
                    "WLAN ohne Scheduler: `esp_rtos::start` muss vor `esp_radio::init` laufen",
                ),
                "malloc" | "free" | "calloc" | "realloc_internal" | "malloc_internal"
                | "calloc_internal" | "free_internal" | "get_free_internal_heap_size" => Some(
                    "WLAN braucht einen Heap: `esp-alloc` einbinden und `heap_allocator!` in main aufrufen",
                ),
                _ => None,
            };
            if let Some(hint) = hint {
                eprintln!();
                eprintln!("Hinweis: {hint}");
                eprintln!();
            }
            std::process::exit(0);
        }
        std::process::exit(1);
    }

    match std::env::current_exe() {
        Ok(exe) => println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        ),
        Err(e) => println!("cargo:warning=Linker-Hinweise deaktiviert: {e}"),
    }
}
