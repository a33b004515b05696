mod cli;

use clap::Parser;
use cli::{Cli, Command};
use review_sentiment::pipelines::sentiment_analysis_pipeline::{
    DeviceSelectable, SentimentAnalysisPipeline, SentimentAnalysisPipelineBuilder, SentimentError,
};
use review_sentiment::render::{self, Renderer};
use std::io::{BufRead, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const UPLOAD_COMMAND: &str = ":upload";

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", render::error(format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.pipeline_config()?;
    let mut builder = SentimentAnalysisPipelineBuilder::from_config(&config)?;
    if cli.cpu {
        builder = builder.cpu();
    }
    let pipeline = builder.build()?;
    let renderer = Renderer::new()?;

    let mut console = Console {
        out: std::io::stdout(),
        err: std::io::stderr(),
    };

    match cli.command {
        Command::Analyze { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            console.analyze(&pipeline, &renderer, &text)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Batch { file, .. } => {
            if console.batch(&pipeline, &renderer, &file, &config.output_path)? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Interactive => {
            let stdin = std::io::stdin();
            console.interactive(&pipeline, &renderer, &config.output_path, stdin.lock())?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Where reports (`out`) and warnings/errors (`err`) are written.
struct Console<O: Write, E: Write> {
    out: O,
    err: E,
}

impl<O: Write, E: Write> Console<O, E> {
    fn analyze(
        &mut self,
        pipeline: &SentimentAnalysisPipeline,
        renderer: &Renderer,
        text: &str,
    ) -> anyhow::Result<()> {
        match pipeline.predict(text) {
            Ok(result) => writeln!(self.out, "{}", renderer.prediction(&result)?)?,
            Err(SentimentError::EmptyInput) => {
                writeln!(self.err, "{}", render::warning(SentimentError::EmptyInput))?
            }
            Err(e) => writeln!(self.err, "{}", render::error(e))?,
        }
        Ok(())
    }

    /// Run the batch path. Nothing is written unless every row was scored.
    /// Returns whether the results file was written.
    fn batch(
        &mut self,
        pipeline: &SentimentAnalysisPipeline,
        renderer: &Renderer,
        file: &Path,
        output: &Path,
    ) -> std::io::Result<bool> {
        let outcome = pipeline
            .predict_file(file)
            .map_err(anyhow::Error::from)
            .and_then(|batch| {
                let csv = batch.results.to_csv()?;
                let report = renderer.distribution(&batch.distribution, batch.results.len())?;
                Ok((report, csv))
            })
            .and_then(|(report, csv)| {
                std::fs::write(output, csv)
                    .map_err(|e| anyhow::anyhow!("could not write {}: {e}", output.display()))?;
                Ok(report)
            });

        match outcome {
            Ok(report) => {
                writeln!(self.out, "{report}")?;
                writeln!(self.out, "📥 Results written to {}", output.display())?;
                Ok(true)
            }
            Err(e) => {
                writeln!(self.err, "{}", render::error(e))?;
                Ok(false)
            }
        }
    }

    /// Line-oriented session. Failures are reported and the session goes on;
    /// only `:quit`, end of input or a broken terminal stop it.
    fn interactive(
        &mut self,
        pipeline: &SentimentAnalysisPipeline,
        renderer: &Renderer,
        output: &Path,
        input: impl BufRead,
    ) -> std::io::Result<()> {
        writeln!(
            self.out,
            "Enter a review per line. `{UPLOAD_COMMAND} FILE` scores a file, `:quit` exits."
        )?;
        let mut lines = input.lines();

        loop {
            write!(self.out, "review> ")?;
            self.out.flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            let command = line.trim();

            if command == ":quit" || command == ":q" {
                break;
            }
            if let Some(path) = command.strip_prefix(UPLOAD_COMMAND) {
                let path = path.trim();
                if path.is_empty() {
                    writeln!(self.err, "{}", render::warning(format!("Usage: {UPLOAD_COMMAND} FILE")))?;
                } else {
                    self.batch(pipeline, renderer, Path::new(path), output)?;
                }
                continue;
            }

            if let Err(e) = self.analyze(pipeline, renderer, &line) {
                writeln!(self.err, "{}", render::error(format!("{e:#}")))?;
            }
        }
        Ok(())
    }
}
