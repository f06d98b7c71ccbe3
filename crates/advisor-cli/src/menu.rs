//! # Interactive Menu
//!
//! Numbered menu over any `BufRead`/`Write` pair so it can be driven from
//! stdin/stdout or from tests. Invalid input re-prompts; end of input exits.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;

use advisor_core::{
    calculate_rewards, classify, simulate_reward, AgentRecord, Amount, Deal, DealSource, Region,
};

use crate::output::{render_classification, render_outcome, render_simulation};

const MENU: &str = "\
Commission advisor
  1) Calculate rewards
  2) Simulate a deal
  3) Classify an agent
  0) Quit
";

struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Prompt until the answer parses. A blank answer takes `default`.
    fn ask<T>(&mut self, label: &str, default: Option<&str>) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            match default {
                Some(d) => write!(self.output, "{label} [{d}]: ")?,
                None => write!(self.output, "{label}: ")?,
            }
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            let raw = match (line.is_empty(), default) {
                (true, Some(d)) => d.to_string(),
                (true, None) => continue,
                (false, _) => line,
            };
            match raw.parse() {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "Invalid input: {e}")?,
            }
        }
    }

    fn rewards(&mut self, today: NaiveDate) -> Result<bool> {
        let mut deals = Vec::new();
        loop {
            write!(self.output, "Fee for deal {} (blank to finish): ", deals.len() + 1)?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(false);
            };
            if line.is_empty() {
                break;
            }
            let fee = match line.parse::<Amount>() {
                Ok(fee) => fee,
                Err(e) => {
                    writeln!(self.output, "Invalid input: {e}")?;
                    continue;
                }
            };
            let Some(source) = self.ask::<DealSource>("Source", Some("self"))? else {
                return Ok(false);
            };
            deals.push(Deal::new(fee, source, today));
        }
        if deals.is_empty() {
            writeln!(self.output, "No deals entered.")?;
            return Ok(true);
        }
        let Some(ytd) = self.ask::<Amount>("Year-to-date total", Some("0"))? else {
            return Ok(false);
        };
        let outcome = calculate_rewards(&deals, ytd);
        write!(self.output, "{}", render_outcome(&outcome))?;
        Ok(true)
    }

    fn simulate(&mut self) -> Result<bool> {
        let Some(fee) = self.ask::<Amount>("Fee", None)? else {
            return Ok(false);
        };
        let Some(source) = self.ask::<DealSource>("Source", Some("self"))? else {
            return Ok(false);
        };
        let Some(ytd) = self.ask::<Amount>("Year-to-date total", Some("0"))? else {
            return Ok(false);
        };
        write!(self.output, "{}", render_simulation(&simulate_reward(fee, source, ytd)))?;
        Ok(true)
    }

    fn classify(&mut self) -> Result<bool> {
        let Some(region) = self.ask::<Region>("Region (capital/other)", Some("capital"))? else {
            return Ok(false);
        };
        let Some(sales) = self.ask::<Amount>("Period sales", None)? else {
            return Ok(false);
        };
        let Some(cases) = self.ask::<u32>("Cumulative cases", None)? else {
            return Ok(false);
        };
        let record = AgentRecord::new(region, sales, cases);
        write!(self.output, "{}", render_classification(&classify(&record)))?;
        Ok(true)
    }
}

/// Run the menu until the user quits or input ends.
pub fn run_menu<R: BufRead, W: Write>(input: R, output: W, today: NaiveDate) -> Result<()> {
    let mut session = Session { input, output };
    loop {
        write!(session.output, "\n{MENU}> ")?;
        session.output.flush()?;

        let Some(choice) = session.read_line()? else {
            break;
        };
        let keep_going = match choice.as_str() {
            "1" => session.rewards(today)?,
            "2" => session.simulate()?,
            "3" => session.classify()?,
            "0" | "q" | "Q" => false,
            other => {
                writeln!(session.output, "Invalid choice: {other:?}")?;
                true
            }
        };
        if !keep_going {
            break;
        }
    }
    writeln!(session.output, "Bye.")?;
    Ok(())
}
