//! Console utility that decodes ADFS update calldata and prints the parsed
//! feed table, ring buffer table and any decode anomalies.
//!
//! Decode errors are reported, never fatal: the exit status is non-zero only
//! when no calldata could be obtained or the hex itself is unparseable.
//! Resolving calldata from a transaction hash requires the RPC observation
//! collaborator and is out of scope here; pipe the calldata in instead.

use std::fs;
use std::path::PathBuf;
use std::process::exit;

use colored::Colorize;
use serde_json::json;
use structopt::StructOpt;

use adfs_codec::{decode_calldata, BatchHeader, HeaderMode, ParsedBatch};

#[derive(Debug, StructOpt)]
#[structopt(name = "adfs-decode", about = "Decode ADFS update calldata")]
struct Opt {
    /// Raw calldata as a hex string, with or without a 0x prefix.
    calldata: Option<String>,

    /// Read the calldata hex from a file instead.
    #[structopt(long, conflicts_with = "calldata")]
    file: Option<PathBuf>,

    /// Interpret the header as a (source, destination) accumulator pair
    /// instead of a block number.
    #[structopt(long)]
    accumulator: bool,

    /// Print the parsed batch as JSON.
    #[structopt(long)]
    json: bool,
}

fn load_hex(opt: &Opt) -> Result<String, String> {
    if let Some(calldata) = &opt.calldata {
        return Ok(calldata.clone());
    }
    if let Some(path) = &opt.file {
        return fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|e| format!("cannot read {}: {e}", path.display()));
    }
    Err("no calldata given; pass a hex string or --file".to_string())
}

fn print_plain(parsed: &ParsedBatch) {
    match &parsed.header {
        Some(BatchHeader::BlockNumber(n)) => println!("Block number:     {n}"),
        Some(BatchHeader::AccumulatorPair {
            source,
            destination,
        }) => {
            println!("Source acc.:      {source:#x}");
            println!("Destination acc.: {destination:#x}");
        }
        None => println!("Header:           <unreadable>"),
    }
    println!(
        "Counts:           {} feed(s), {} table entr(ies)",
        parsed.feeds_len, parsed.indices_len
    );

    if !parsed.feeds.is_empty() {
        println!("\n{:<8} {:<8} {:<8} data", "feed id", "stride", "index");
        for feed in &parsed.feeds {
            println!(
                "{:<8} {:<8} {:<8} 0x{}",
                feed.id,
                feed.stride,
                feed.index,
                hex::encode(&feed.data)
            );
        }
    }

    if !parsed.ring_buffer_table.is_empty() {
        println!("\n{:<36} index", "slot key");
        for entry in &parsed.ring_buffer_table {
            println!("{:<#36x} {}", entry.slot_key, entry.index);
        }
    }
}

fn main() {
    env_logger::init();
    let opt = Opt::from_args();

    let hex_input = match load_hex(&opt) {
        Ok(h) => h,
        Err(msg) => {
            eprintln!("{}", msg.red());
            exit(1);
        }
    };

    let stripped = hex_input.strip_prefix("0x").unwrap_or(&hex_input);
    let calldata = match hex::decode(stripped) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{}", format!("invalid calldata hex: {e}").red());
            exit(1);
        }
    };

    let mode = if opt.accumulator {
        HeaderMode::AccumulatorPair
    } else {
        HeaderMode::BlockNumber
    };
    let (parsed, errors) = decode_calldata(&calldata, mode);

    if opt.json {
        let report = json!({
            "parsed": parsed,
            "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("{}", format!("cannot render report: {e}").red());
                exit(1);
            }
        }
    } else {
        print_plain(&parsed);
        if !errors.is_empty() {
            eprintln!("\n{}", "decode errors:".red().bold());
            for err in &errors {
                eprintln!("  {}", err.to_string().red());
            }
        }
    }
}
