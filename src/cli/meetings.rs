use crate::db::{self, meetings::MeetingRepository};
use anyhow::{anyhow, Result};

use super::args::MeetingsCliArgs;

pub fn handle_meetings_command(args: MeetingsCliArgs) -> Result<()> {
    let conn = db::init_db()?;

    // Show one full record when an id is given.
    if let Some(id) = args.id {
        let record = MeetingRepository::get(&conn, &id)?
            .ok_or_else(|| anyhow!("Meeting with ID {} not found", id))?;

        println!("ID: {}", record.id);
        if let Some(name) = &record.original_name {
            println!("File: {}", name);
        }
        println!("Status: {}", record.status.as_str());
        println!("Created: {}", record.created_at);
        println!("Updated: {}", record.updated_at);

        if !record.summary.is_empty() {
            println!("\nSummary:\n{}", record.summary);
        }
        if !record.key_decisions.is_empty() {
            println!("\nKey decisions:");
            for decision in &record.key_decisions {
                println!("  - {}", decision);
            }
        }
        if !record.action_items.is_empty() {
            println!("\nAction items:");
            for item in &record.action_items {
                println!("  - {} (owner: {}, deadline: {})", item.task, item.owner, item.deadline);
            }
        }
        if !record.transcript.is_empty() {
            println!("\nTranscript:\n{}", record.transcript);
        }
        return Ok(());
    }

    let meetings = MeetingRepository::list(&conn, args.limit)?;

    if meetings.is_empty() {
        println!("No meetings found.");
        return Ok(());
    }

    println!("Found {} meeting(s):\n", meetings.len());

    for record in meetings {
        println!("ID: {}", record.id);
        if let Some(name) = &record.original_name {
            println!("File: {}", name);
        }
        println!("Status: {}", record.status.as_str());
        println!("Created: {}", record.created_at);
        println!("---");
    }

    println!("\nTo view a full record, use: recap meetings --id <ID>");

    Ok(())
}
