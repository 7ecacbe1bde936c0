use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use std::path::PathBuf;

use cpfw_rs::image::hex_dump;
use cpfw_rs::{Driver, Firmware, Layout, PktTable};

#[derive(Parser, Debug)]
#[command(author, version, about = "F32 firmware disassembler CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Disassemble the code region with resolved branch labels
    Listing {
        /// Input firmware image (a zstd wrapper is detected and undone)
        #[arg(value_name = "FWFILE")]
        input: PathBuf,
        /// Opcode-name table, one "NAME ... OPCODE" per line
        #[arg(long, default_value = "pkt3.txt", value_name = "FILE")]
        pkt_table: PathBuf,
        /// Byte offset of the jump-table region start (hex or dec)
        #[arg(long, default_value = "0x40200")]
        jtab_start: String,
        /// Byte offset of the jump-table region end (exclusive)
        #[arg(long, default_value = "0x40357")]
        jtab_end: String,
        /// Byte offset of the code region start
        #[arg(long, default_value = "0x200")]
        code_start: String,
        /// Byte offset of the code region end (exclusive)
        #[arg(long, default_value = "0x7a80")]
        code_end: String,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// Export labels to JSON (Vec<{ addr, name }>)
        #[arg(long, value_name = "FILE")]
        labels_out: Option<PathBuf>,
    },
    /// Classify a single 32-bit packet word
    Pkt {
        /// Packet word (hex or dec)
        word: String,
        /// Opcode-name table
        #[arg(long, default_value = "pkt3.txt", value_name = "FILE")]
        pkt_table: PathBuf,
    },
    /// Dump a byte range as raw little-endian words
    Hexdump {
        #[arg(value_name = "FWFILE")]
        input: PathBuf,
        /// Start offset (hex or dec)
        #[arg(long, default_value = "0")]
        start: String,
        /// End offset (exclusive; default: end of image)
        #[arg(long)]
        end: Option<String>,
    },
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct LabelKV {
    addr: u32,
    name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Listing {
            input,
            pkt_table,
            jtab_start,
            jtab_end,
            code_start,
            code_end,
            out,
            labels_out,
        } => {
            let layout = Layout {
                jtab_start: parse_u32(&jtab_start)? as usize,
                jtab_end: parse_u32(&jtab_end)? as usize,
                code_start: parse_u32(&code_start)? as usize,
                code_end: parse_u32(&code_end)? as usize,
            };
            anyhow::ensure!(layout.jtab_start <= layout.jtab_end, "jump-table region is inverted");
            anyhow::ensure!(layout.code_start <= layout.code_end, "code region is inverted");

            let fw = Firmware::load(&input)
                .with_context(|| format!("loading {}", input.display()))?;
            let pkts = PktTable::load(&pkt_table)
                .with_context(|| format!("loading {}", pkt_table.display()))?;

            let header = fw.jtab_region(&layout)?;
            let code = fw.code_region(&layout)?;

            let mut drv = Driver::new();
            let text = drv.disassemble(header, code, &pkts);
            if let Some(path) = out {
                std::fs::write(path, text)?;
            } else {
                print!("{text}");
            }

            if let Some(path) = labels_out {
                let arr: Vec<LabelKV> = drv
                    .labels
                    .iter()
                    .filter_map(|(addr, name)| name.map(|n| LabelKV { addr, name: n.to_string() }))
                    .collect();
                std::fs::write(path, serde_json::to_string_pretty(&arr)?)?;
            }
        }
        Command::Pkt { word, pkt_table } => {
            let word = parse_u32(&word)?;
            let pkts = PktTable::load(&pkt_table)
                .with_context(|| format!("loading {}", pkt_table.display()))?;
            println!("{}", pkts.classify(word));
        }
        Command::Hexdump { input, start, end } => {
            let fw = Firmware::load(&input)
                .with_context(|| format!("loading {}", input.display()))?;
            let start = parse_u32(&start)? as usize;
            let end = match end {
                Some(e) => parse_u32(&e)? as usize,
                None => fw.len(),
            };
            anyhow::ensure!(start <= end, "end must be >= start");
            print!("{}", hex_dump(fw.region(start, end)?));
        }
    }

    Ok(())
}
