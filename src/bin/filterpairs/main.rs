use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use hanzi_pairs::filter::{FilterOptions, LookupMissPolicy};
use hanzi_pairs::pipeline::{self, PipelinePaths};
use itertools::Itertools;

/// Keeps the two-character words of a word list that aren't covered yet and
/// annotates them with pinyin and tone numbers.
#[derive(Parser, Debug)]
#[command(name = "filterpairs")]
struct Args {
  /// Master word list, one word per line.
  #[arg()]
  master: PathBuf,

  /// Words already covered; exact line matches are left out.
  #[arg()]
  covered: PathBuf,

  /// CC-CEDICT dictionary used for pinyin.
  #[arg()]
  dictionary: PathBuf,

  /// Where the `word pinyin tones` lines go.
  #[arg()]
  output: PathBuf,

  /// Where the tone pair frequencies go.
  #[arg()]
  stats: PathBuf,

  /// Fail instead of skipping words missing from the dictionary.
  #[arg(long)]
  strict: bool,

  /// Add a fourth column with the reading after tone sandhi.
  #[arg(long)]
  pronounced: bool,

  /// Also write the frequencies as JSON.
  #[arg(long)]
  stats_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_target(false)
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let args = Args::parse();

  let paths = PipelinePaths {
    master: args.master,
    covered: args.covered,
    dictionary: args.dictionary,
    output: args.output,
    stats: args.stats,
    stats_json: args.stats_json,
  };
  let options = FilterOptions {
    lookup_miss: if args.strict { LookupMissPolicy::Abort } else { LookupMissPolicy::Skip },
    pronounced: args.pronounced,
  };

  let report = pipeline::run(&paths, options)
    .with_context(|| format!("filtering {} into {}", paths.master.display(), paths.output.display()))?;

  println!("Wrote {} words to {}", report.summary.written, paths.output.display());
  println!("Tone pairs: {}", report.table.items.iter().map(|(tones, count)| format!("{}={}", tones, count)).format(", "));
  println!("Done!");

  Ok(())
}
