// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cross-platform MIDI backend using midir.

use anyhow::{anyhow, Result};
use midir::{MidiOutput as MidirClient, MidiOutputConnection};
use tracing::info;

use super::MidiOutput;

const CLIENT_NAME: &str = "chordbook";

/// midir output connection
pub struct MidirOutput {
    conn: MidiOutputConnection,
    port_name: String,
}

impl MidirOutput {
    /// Connect to the destination at `destination_index`.
    ///
    /// # Arguments
    /// * `destination_index` - Index into [`list_destinations`]
    pub fn new(destination_index: usize) -> Result<Self> {
        let client = MidirClient::new(CLIENT_NAME)
            .map_err(|e| anyhow!("Failed to create MIDI client: {}", e))?;

        let ports = client.ports();
        let port = ports.get(destination_index).ok_or_else(|| {
            anyhow!(
                "MIDI destination {} not found (only {} available)",
                destination_index,
                ports.len()
            )
        })?;

        let port_name = client
            .port_name(port)
            .unwrap_or_else(|_| format!("Unknown {}", destination_index));
        let conn = client
            .connect(port, "chordbook-out")
            .map_err(|e| anyhow!("Failed to connect to {}: {}", port_name, e))?;

        info!(port = %port_name, "connected MIDI output");
        Ok(Self { conn, port_name })
    }

    /// Connect to the first destination whose name contains `name`, ignoring case
    pub fn by_name(name: &str) -> Result<Self> {
        let needle = name.to_lowercase();
        let (index, _) = list_destinations()
            .into_iter()
            .find(|(_, n)| n.to_lowercase().contains(&needle))
            .ok_or_else(|| anyhow!("No MIDI destination matching '{}' found", name))?;

        Self::new(index)
    }

    /// Name of the connected port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl MidiOutput for MidirOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.conn
            .send(message)
            .map_err(|e| anyhow!("Failed to send MIDI message: {}", e))
    }
}

/// List all available MIDI destinations as (index, name) pairs.
///
/// Returns an empty list if the MIDI system cannot be opened.
pub fn list_destinations() -> Vec<(usize, String)> {
    let Ok(client) = MidirClient::new(CLIENT_NAME) else {
        return Vec::new();
    };

    client
        .ports()
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let name = client
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown {}", i));
            (i, name)
        })
        .collect()
}

/// Print all available MIDI destinations to stdout.
pub fn print_destinations() {
    let destinations = list_destinations();
    if destinations.is_empty() {
        println!("No MIDI destinations found.");
    } else {
        println!("Available MIDI destinations:");
        for (i, name) in destinations {
            println!("  {}: {}", i, name);
        }
    }
}
