use colored::Colorize;

use crate::{
    common::{
        constants::{PRINT_PRECISION, PRINT_WIDTH},
        utils::time_format,
    },
    error::Result,
    Booster,
    WeakLearner,
};

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::Instant;
use std::ops::ControlFlow;

const DEFAULT_ROUND: usize = 10;
const DEFAULT_TIMELIMIT_MILLIS: u128 = u128::MAX;
const FULL_WIDTH: usize = 60;
const STAT_WIDTH: usize = (FULL_WIDTH - 4) / 2;
const HEADER: &str = "Round,Feature,Theta,SharingSet,Error,ExpLoss,Time\n";


/// What a booster exposes after each round.
pub trait RoundSummary {
    /// The number of rounds performed so far.
    fn rounds(&self) -> usize;

    /// The weak learner of the last round, if any.
    fn last_learner(&self) -> Option<&WeakLearner>;

    /// The current exponential loss `Σ_i Σ_c w[i][c]`.
    fn exponential_loss(&self) -> f64;
}


/// Struct `Logger` runs a boosting algorithm round by round,
/// prints its progress and writes one CSV line per round.
///
/// # Example
/// ```no_run
/// use jointboost::prelude::*;
/// # let provider = DenseFeatures::new(vec![vec![0, 1]], vec![0, 1], 2);
///
/// let booster = JointBoost::init(provider)
///     .unwrap()
///     .max_rounds(200);
/// let model = Logger::new(booster)
///     .print_every(10)
///     .run("jointboost.csv")
///     .unwrap();
/// ```
pub struct Logger<B> {
    booster: B,
    time_limit: u128,
    round: usize,
}


impl<B> Logger<B> {
    /// Create a new instance of `Logger`.
    pub fn new(booster: B) -> Self {
        Self {
            booster,
            time_limit: DEFAULT_TIMELIMIT_MILLIS,
            round: DEFAULT_ROUND,
        }
    }

    /// Returns the wrapped booster.
    pub fn into_inner(self) -> B {
        self.booster
    }
}


impl<B> Logger<B>
    where B: Booster + RoundSummary,
{
    /// Set the time limit for boosting algorithm as milliseconds.
    /// If the boosting algorithm reaches this limit,
    /// breaks immediately.
    #[inline(always)]
    pub fn time_limit_as_millis(mut self, time_limit: u128) -> Self {
        self.time_limit = time_limit;
        self
    }

    /// Set the time limit for boosting algorithm as seconds.
    #[inline(always)]
    pub fn time_limit_as_secs(mut self, time_limit: u64) -> Self {
        self.time_limit = (time_limit as u128).saturating_mul(1_000);
        self
    }

    /// Set the interval to print the current status.
    /// By default, the method `run` prints its status every `10` rounds.
    /// If you don't want to print the log,
    /// set `usize::MAX`.
    #[inline(always)]
    pub fn print_every(mut self, round: usize) -> Self {
        self.round = round.max(1);
        self
    }

    #[inline(always)]
    fn print_log_header(&self) {
        println!(
            "      {:>PRINT_WIDTH$}\t{:>PRINT_WIDTH$}\t\
            {:>PRINT_WIDTH$}\t{:>PRINT_WIDTH$}\t{:>PRINT_WIDTH$}",
            "ROUND".bold().red(),
            "FEATURE".bold().blue(),
            "ERROR".bold().green(),
            "EXP.LOSS".bold().yellow(),
            "TIME".bold().cyan(),
        );
    }

    /// print current settings.
    #[inline(always)]
    fn print_stats(&self) {
        let limit = if self.time_limit != u128::MAX {
            time_format(self.time_limit)
        } else {
            "Nothing".into()
        };
        let header = format!(
            "{:=>FULL_WIDTH$}\n{:^FULL_WIDTH$}\n{:->FULL_WIDTH$}",
            "", "STATS".bold(), "",
        );
        println!(
            "\n{header}\n\
            + {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}",
            "Booster".bold(),
            self.booster.name().bold().green(),
        );

        if let Some(info) = self.booster.info() {
            let line = info.into_iter()
                .map(|(key, val)| {
                    format!(
                        "    + {:<STAT_WIDTH$}\t{:>width$}",
                        key,
                        val.bold().yellow(),
                        width = STAT_WIDTH - 8
                    )
                })
                .collect::<Vec<_>>()
                .join("\n");
            println!("{line}");
        }
        println!(
            "+ {:<STAT_WIDTH$}\t{:>STAT_WIDTH$}\n{:=^FULL_WIDTH$}\n",
            "Time Limit".bold(),
            limit.bold().green(),
            "".bold(),
        );
    }

    fn print_line(&self, tag: colored::ColoredString, iter: usize, time: u128) {
        let (feature, error) = match self.booster.last_learner() {
            Some(wl) if wl.is_valid() => (format!("{}", wl.d), wl.error),
            _ => ("-".to_string(), f64::INFINITY),
        };
        println!(
            "{} {}\t{}\t{}\t{}\t{}",
            tag,
            format!("{:>PRINT_WIDTH$}", iter).red(),
            format!("{:>PRINT_WIDTH$}", feature).blue(),
            format!("{:>PRINT_WIDTH$.PRINT_PRECISION$}", error).green(),
            format!(
                "{:>PRINT_WIDTH$.PRINT_PRECISION$}",
                self.booster.exponential_loss()
            ).yellow(),
            time_format(time).bold().cyan(),
        );
    }

    // Rounds without a valid weak learner leave the rule fields empty.
    fn csv_line(&self, iter: usize, time: u128) -> String {
        let loss = self.booster.exponential_loss();
        match self.booster.last_learner() {
            Some(wl) if wl.is_valid() => format!(
                "{iter},{},{},{},{},{loss},{time}\n",
                wl.d, wl.theta,
                wl.n.classes()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
                wl.error,
            ),
            _ => format!("{iter},,,,inf,{loss},{time}\n"),
        }
    }

    /// Run the given boosting algorithm with logging.
    /// Note that this method is almost the same as `Booster::run`.
    /// This method measures running time per round.
    pub fn run<P: AsRef<Path>>(&mut self, filename: P) -> Result<B::Output> {
        // Open file
        let mut file = File::create(filename)?;

        // Write header to the file
        file.write_all(HEADER.as_bytes())?;

        // ---------------------------------------------------------------------
        // Pre-processing
        self.booster.preprocess();
        let print = self.round != usize::MAX;
        if print {
            self.print_stats();
            self.print_log_header();
        }

        // Cumulative time
        let mut time_acc = 0;
        let mut io_error = None;

        // ---------------------------------------------------------------------
        // Boosting step
        let _ = (1..).try_for_each(|iter| {
            let rounds = self.booster.rounds();

            // Start measuring time
            let now = Instant::now();

            let flow = self.booster.boost(iter);

            // Stop measuring and convert `Duration` to Milliseconds.
            let time = now.elapsed().as_millis();

            // Update the cumulative time
            time_acc += time;

            // Write the results to `file`.
            // A booster may stop right after a round it did perform.
            if self.booster.rounds() > rounds {
                if let Err(e) = file.write_all(self.csv_line(iter, time_acc).as_bytes()) {
                    io_error = Some(e);
                    return ControlFlow::Break(iter);
                }
            }

            if let ControlFlow::Break(_) = flow {
                if print {
                    self.print_line("[FIN]".bold().bright_green(), iter, time_acc);
                }
                return flow;
            }

            if time_acc > self.time_limit {
                if print {
                    self.print_line("[TLE]".bold().bright_red(), iter, time_acc);
                }
                return ControlFlow::Break(iter);
            }

            if print && iter % self.round == 0 {
                self.print_line("[LOG]".bold().magenta(), iter, time_acc);
            }
            ControlFlow::Continue(())
        });

        if let Some(e) = io_error {
            return Err(e.into());
        }

        let f = self.booster.postprocess();
        Ok(f)
    }
}
