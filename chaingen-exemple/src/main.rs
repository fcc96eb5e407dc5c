use std::io::BufRead;
use std::{env, fs, io};

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use chaingen_core::model::chain::Chain;
use chaingen_core::model::query::Query;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Context window width: up to 10 preceding tokens condition each
    // transition weight
    let mut chain = Chain::new(10)?;

    // One random source shared across every query
    let mut rng = StdRng::from_os_rng();

    // Read the corpus from the file given as first argument, or from
    // standard input line by line
    let lines: Vec<String> = match env::args().nth(1) {
        Some(path) => fs::read_to_string(path)?
            .lines()
            .map(str::to_owned)
            .collect(),
        None => io::stdin().lock().lines().collect::<Result<_, _>>()?,
    };

    for line in &lines {
        // Train on the line, then answer it: seed a query with the same
        // words and extend it up to 50 tokens
        chain.ingest(line, ' ', 1.0);

        let mut query = Query::from_text(&chain, line, ' ', Some(&mut rng))?;
        query.advance_until(50);

        println!("{}", query.text());
    }

    info!(
        "Ingested {} sentences, vocabulary size {}",
        lines.len(),
        chain.vocabulary().len()
    );

    Ok(())
}
