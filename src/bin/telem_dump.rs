//! Telemetry dump utility
//! Decodes raw packet payloads against a format catalog and prints the
//! named fields with units and display decimals

use std::env;
use std::fs;

use telepack_rs::{
    decode_packet, dispatch, load_catalog, DecodedValue, Inbound, Registry,
};
use tracing_subscriber::{prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format_layer = tracing_subscriber::fmt::layer().with_target(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <catalog.json> <id> <hex-payload>", args[0]);
        eprintln!("       {} <catalog.json> --log <capture_file>", args[0]);
        eprintln!("\nExamples:");
        eprintln!(
            "  {} packets.json 0x21 fa00feff0a    # decode one payload",
            args[0]
        );
        eprintln!(
            "  {} packets.json --log capture.txt  # decode 'id:hex' lines",
            args[0]
        );
        std::process::exit(1);
    }

    let catalog_path = &args[1];

    tracing::info!("Loading format catalog: {}", catalog_path);
    let formats = load_catalog(catalog_path)?;
    let registry = Registry::load(formats)?;
    tracing::info!("Loaded {} packet formats", registry.len());

    if args[2] == "--log" {
        let log_path = args
            .get(3)
            .ok_or_else(|| anyhow::anyhow!("--log requires a capture file path"))?;
        let capture = fs::read_to_string(log_path)?;

        for (line_no, line) in capture.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(':') {
                Some((id, hex)) => decode_one(&registry, parse_id(id)?, &parse_hex(hex)?),
                None => tracing::warn!("line {}: expected 'id:hex', skipping", line_no + 1),
            }
        }
    } else {
        let id = parse_id(&args[2])?;
        let payload = parse_hex(args.get(3).map(String::as_str).unwrap_or(""))?;
        decode_one(&registry, id, &payload);
    }

    Ok(())
}

fn decode_one(registry: &Registry, id: u32, payload: &[u8]) {
    // Console side-channel packets are plain text, not field data
    let mut packet = match dispatch(id, payload) {
        Inbound::Console(text) => {
            println!("[console] {}", text.trim_end());
            return;
        }
        Inbound::Telemetry(packet) => packet,
    };

    if let Err(e) = decode_packet(registry, &mut packet) {
        tracing::warn!("Packet {:#X}: {}", id, e);
        return;
    }

    println!(
        "Packet {:#X} \"{}\"{}",
        packet.id,
        packet.name.as_deref().unwrap_or("?"),
        packet
            .board
            .as_deref()
            .map(|b| format!(" [{}]", b))
            .unwrap_or_default()
    );

    let mut fields: Vec<(&String, &DecodedValue)> = packet.decoded.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (name, value) in fields {
        let cvalue = match value.decimals {
            Some(d) => format!("{:.*}", d as usize, value.cvalue),
            None => format!("{}", value.cvalue),
        };
        if value.unit.is_empty() {
            println!("  {:<20} {}", name, cvalue);
        } else {
            println!("  {:<20} {} {}", name, cvalue, value.unit);
        }
    }
    println!();
}

fn parse_id(text: &str) -> anyhow::Result<u32> {
    let text = text.trim();
    let id = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16)?,
        None => text.parse()?,
    };
    Ok(id)
}

fn parse_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() % 2 != 0 {
        anyhow::bail!("hex payload has an odd number of digits");
    }
    (0..cleaned.len())
        .step_by(2)
        .map(|i| Ok(u8::from_str_radix(&cleaned[i..i + 2], 16)?))
        .collect()
}
