//! Command handlers.

use std::error::Error;
use std::io::Write;

use levelq_queue::{Codec, KvStore, PersistentQueue, QueueError};
use tracing::info;

use crate::cli::Commands;

/// Run one command against an open queue, writing results to `out`.
pub(crate) fn execute<S, C, W>(
    queue: &PersistentQueue<S, C>,
    command: &Commands,
    out: &mut W,
) -> Result<(), Box<dyn Error>>
where
    S: KvStore,
    C: Codec,
    W: Write,
{
    match command {
        Commands::Push { values } => {
            for value in values {
                queue.enqueue(value.as_bytes())?;
            }
            info!("Pushed {} values", values.len());
            writeln!(out, "{}", queue.length())?;
        }
        Commands::Pop { count } => {
            for _ in 0..*count {
                match queue.dequeue() {
                    Ok(value) => writeln!(out, "{}", String::from_utf8_lossy(&value))?,
                    Err(QueueError::Empty) => break,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        Commands::Len => {
            writeln!(out, "{}", queue.length())?;
        }
        Commands::Status => {
            let (head, tail) = queue.positions();
            let data_dir = queue
                .data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(memory)".to_string());
            writeln!(out, "data_dir: {}", data_dir)?;
            writeln!(out, "head:     {}", head)?;
            writeln!(out, "tail:     {}", tail)?;
            writeln!(out, "length:   {}", queue.length())?;
            writeln!(out, "capacity: {}", queue.capacity())?;
        }
        Commands::Get { id } => {
            let value = queue.lookup(*id)?;
            writeln!(out, "{}", String::from_utf8_lossy(&value))?;
        }
        Commands::Drop { yes } => {
            if !yes {
                return Err("refusing to drop the queue without --yes".into());
            }
            queue.destroy()?;
            writeln!(out, "dropped")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelq_queue::MemoryStore;

    fn queue() -> PersistentQueue<MemoryStore> {
        PersistentQueue::with_store(MemoryStore::new(), 100).unwrap()
    }

    fn run(queue: &PersistentQueue<MemoryStore>, command: Commands) -> String {
        let mut out = Vec::new();
        execute(queue, &command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_push_then_pop() {
        let queue = queue();
        let pushed = run(
            &queue,
            Commands::Push {
                values: vec!["a".into(), "b".into(), "c".into()],
            },
        );
        assert_eq!(pushed, "3\n");

        assert_eq!(run(&queue, Commands::Pop { count: 2 }), "a\nb\n");
        assert_eq!(run(&queue, Commands::Len), "1\n");
    }

    #[test]
    fn test_pop_stops_when_empty() {
        let queue = queue();
        queue.enqueue(b"only").unwrap();
        assert_eq!(run(&queue, Commands::Pop { count: 5 }), "only\n");
        assert_eq!(run(&queue, Commands::Pop { count: 1 }), "");
    }

    #[test]
    fn test_status() {
        let queue = queue();
        queue.enqueue(b"x").unwrap();
        let status = run(&queue, Commands::Status);
        assert!(status.contains("data_dir: (memory)"));
        assert!(status.contains("tail:     1"));
        assert!(status.contains("capacity: 100"));
    }

    #[test]
    fn test_get_out_of_bounds() {
        let queue = queue();
        queue.enqueue(b"x").unwrap();
        assert_eq!(run(&queue, Commands::Get { id: 1 }), "x\n");

        let mut out = Vec::new();
        assert!(execute(&queue, &Commands::Get { id: 9 }, &mut out).is_err());
    }

    #[test]
    fn test_drop_requires_confirmation() {
        let queue = queue();
        let mut out = Vec::new();
        assert!(execute(&queue, &Commands::Drop { yes: false }, &mut out).is_err());
        assert!(queue.is_open());

        assert_eq!(run(&queue, Commands::Drop { yes: true }), "dropped\n");
        assert!(!queue.is_open());
    }
}
