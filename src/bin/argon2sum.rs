//! `argon2sum`: a thin CLI front end for the `argon2kit` library.
//!
//! Parses arguments with `clap`'s derive API and prints a PHC string.

use argon2kit::{hash, phc_encode, ParamsBuilder, Variant, Version};
use clap::Parser;

#[derive(Parser)]
#[command(name = "argon2sum", about = "Hash a password with Argon2 and print the PHC string")]
struct Cli {
    /// Argon2 variant.
    #[arg(long, value_enum, default_value = "id")]
    variant: VariantArg,

    /// Argon2 wire version (16 = 0x10, 19 = 0x13).
    #[arg(long, default_value = "19")]
    version: u32,

    /// Memory cost in KiB.
    #[arg(short = 'm', long = "memory", default_value = "19456")]
    memory_kib: u32,

    /// Time cost (iterations).
    #[arg(short = 't', long = "iterations", default_value = "2")]
    iterations: u32,

    /// Parallelism (lanes).
    #[arg(short = 'p', long = "parallelism", default_value = "1")]
    parallelism: u32,

    /// Output tag length in bytes.
    #[arg(short = 'l', long = "length", default_value = "32")]
    tag_len: usize,

    /// Salt bytes, taken verbatim from the argument.
    #[arg(long)]
    salt: String,

    /// Password to hash.
    password: String,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum VariantArg {
    D,
    I,
    Id,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Variant {
        match v {
            VariantArg::D => Variant::Argon2d,
            VariantArg::I => Variant::Argon2i,
            VariantArg::Id => Variant::Argon2id,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let version = Version::from_decimal(cli.version).unwrap_or_else(|| {
        eprintln!("error: unsupported version {}, expected 16 or 19", cli.version);
        std::process::exit(1);
    });

    let params = ParamsBuilder::new()
        .variant(cli.variant.into())
        .version(version)
        .m_cost(cli.memory_kib)
        .t_cost(cli.iterations)
        .lanes(cli.parallelism)
        .tag_len(cli.tag_len)
        .salt(cli.salt.into_bytes())
        .build()
        .unwrap_or_else(|e| {
            eprintln!("error: {e}");
            std::process::exit(1);
        });

    let tag = hash(&params, cli.password.as_bytes());
    match phc_encode(&params, &tag) {
        Ok(phc) => println!("{phc}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
