//! Command UART receive task
//!
//! Receives newline-terminated command words (`OPEN`, `CLOSE`, `AUTO`) from
//! the network bridge and forwards the resulting mode to the control task.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;
use heapless::String;

use varal_core::control::OperatingMode;

use crate::channels::MODE_CMD;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Longest accepted command line
const MAX_LINE_LEN: usize = 32;

#[embassy_executor::task]
pub async fn command_rx_task(mut rx: BufferedUartRx) {
    info!("Command RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    let mut line: String<MAX_LINE_LEN> = String::new();
    let mut overflowed = false;

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match byte {
                        b'\n' | b'\r' => {
                            if overflowed {
                                warn!("Command line too long or not ASCII, dropped");
                            } else if !line.is_empty() {
                                handle_command(line.as_str());
                            }
                            line.clear();
                            overflowed = false;
                        }
                        _ if overflowed => {}
                        _ => {
                            // Non-ASCII bytes can never form a valid command
                            let pushed = byte.is_ascii() && line.push(byte as char).is_ok();
                            if !pushed {
                                overflowed = true;
                            }
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}

fn handle_command(command: &str) {
    match OperatingMode::from_command(command) {
        Ok(mode) => {
            debug!("Command {=str} -> {}", command, mode.as_str());
            MODE_CMD.signal(mode);
        }
        Err(_) => warn!("Unknown command: {=str}", command),
    }
}
