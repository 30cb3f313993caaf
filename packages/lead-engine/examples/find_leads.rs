//! Find Leads - end-to-end acquisition against Gemini
//!
//! Runs one acquisition and prints each lead as it is accepted, then the
//! final list. Reads `GEMINI_API_KEY` (or `API_KEY`) from the environment.
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run -p lead-engine --example find_leads --features gemini -- plumbers "Austin, TX" 15
//! ```

use lead_engine::{AcquireError, GeminiProvider, LeadFinder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let term = args.next().unwrap_or_else(|| "coffee shops".to_string());
    let location = args.next().unwrap_or_else(|| "Duluth, MN".to_string());
    let count: usize = args.next().map(|c| c.parse()).transpose()?.unwrap_or(10);

    let finder = LeadFinder::new(GeminiProvider::from_env()?);

    let progress = |n: usize| println!("... {n}/{count}");
    match finder.acquire(&term, &location, count, Some(&progress)).await {
        Ok(leads) => {
            for lead in &leads {
                println!(
                    "{:<40} {:<18} {}",
                    lead.name,
                    lead.phone,
                    lead.rating.map(|r| format!("{r:.1}")).unwrap_or_default()
                );
            }
            println!("\n{} of {count} leads", leads.len());
        }
        Err(AcquireError::NoData { queries, .. }) => {
            println!("Nothing found after {queries} queries");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
