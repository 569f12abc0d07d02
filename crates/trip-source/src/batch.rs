//! Batching of trip events for insert workers.

use crate::error::SourceError;
use bench_core::{Batch, TripEvent};

/// Groups a trip event stream into batches of a fixed size.
///
/// Every batch except the last holds exactly `batch_size` events; the last
/// holds the remainder and is never empty. Batches preserve source order.
/// The first read error is yielded once and ends the sequence.
pub struct BatchSource<I> {
    events: I,
    batch_size: usize,
    done: bool,
}

impl<I> BatchSource<I>
where
    I: Iterator<Item = Result<TripEvent, SourceError>>,
{
    pub fn new(events: I, batch_size: usize) -> Result<Self, SourceError> {
        if batch_size == 0 {
            return Err(SourceError::InvalidBatchSize);
        }
        Ok(Self {
            events,
            batch_size,
            done: false,
        })
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<I> Iterator for BatchSource<I>
where
    I: Iterator<Item = Result<TripEvent, SourceError>>,
{
    type Item = Result<Batch, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut batch = Vec::with_capacity(self.batch_size);
        while batch.len() < self.batch_size {
            match self.events.next() {
                Some(Ok(event)) => batch.push(event),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(Ok(batch))
        }
    }
}

/// Collect the distinct trip ids of an event stream.
///
/// Only adjacent repeats are collapsed: the dataset is sorted by trip, so
/// every trip appears as one contiguous run.
pub fn distinct_trip_ids<I>(events: I) -> Result<Vec<String>, SourceError>
where
    I: IntoIterator<Item = Result<TripEvent, SourceError>>,
{
    let mut trip_ids: Vec<String> = Vec::new();
    for event in events {
        let event = event?;
        if trip_ids.last() != Some(&event.trip_id) {
            trip_ids.push(event.trip_id);
        }
    }
    Ok(trip_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(count: usize) -> Vec<Result<TripEvent, SourceError>> {
        (0..count)
            .map(|i| {
                Ok(TripEvent::new(
                    format!("e{i}"),
                    format!("t{}", i / 3),
                    format!("2025-01-01T00:00:{:02}Z", i % 60),
                    "52.52",
                    "13.40",
                ))
            })
            .collect()
    }

    fn batch_sizes(count: usize, batch_size: usize) -> Vec<usize> {
        BatchSource::new(events(count).into_iter(), batch_size)
            .unwrap()
            .map(|b| b.unwrap().len())
            .collect()
    }

    #[test]
    fn test_batch_counts() {
        assert_eq!(batch_sizes(5, 2), vec![2, 2, 1]);
        assert_eq!(batch_sizes(6, 2), vec![2, 2, 2]);
        assert_eq!(batch_sizes(1, 10), vec![1]);
        assert_eq!(batch_sizes(0, 3), Vec::<usize>::new());
    }

    #[test]
    fn test_batch_count_formula() {
        for count in 0..40usize {
            for batch_size in 1..9usize {
                let sizes = batch_sizes(count, batch_size);
                assert_eq!(sizes.len(), count.div_ceil(batch_size));
                if let Some((last, full)) = sizes.split_last() {
                    assert!(full.iter().all(|s| *s == batch_size));
                    let remainder = count % batch_size;
                    let expected_last = if remainder == 0 { batch_size } else { remainder };
                    assert_eq!(*last, expected_last);
                }
            }
        }
    }

    #[test]
    fn test_concatenation_preserves_order() {
        let source = BatchSource::new(events(23).into_iter(), 4).unwrap();
        let flattened: Vec<String> = source
            .flat_map(|b| b.unwrap())
            .map(|e| e.event_id)
            .collect();
        let expected: Vec<String> = (0..23).map(|i| format!("e{i}")).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_zero_batch_size() {
        assert!(matches!(
            BatchSource::new(events(3).into_iter(), 0),
            Err(SourceError::InvalidBatchSize)
        ));
    }

    #[test]
    fn test_error_ends_sequence() {
        let mut input = events(3);
        input.insert(
            2,
            Err(SourceError::MalformedRow {
                line: 4,
                expected: 5,
                found: 1,
            }),
        );
        let mut source = BatchSource::new(input.into_iter(), 2).unwrap();

        assert_eq!(source.next().unwrap().unwrap().len(), 2);
        assert!(source.next().unwrap().is_err());
        assert!(source.next().is_none());
    }

    #[test]
    fn test_distinct_trip_ids_collapses_adjacent_runs() {
        let trip_ids = distinct_trip_ids(events(10)).unwrap();
        assert_eq!(trip_ids, vec!["t0", "t1", "t2", "t3"]);
    }

    #[test]
    fn test_distinct_trip_ids_keeps_non_adjacent_repeats() {
        let input = ["a", "a", "b", "a"]
            .iter()
            .enumerate()
            .map(|(i, trip)| Ok(TripEvent::new(format!("e{i}"), *trip, "ts", "0", "0")));
        assert_eq!(distinct_trip_ids(input).unwrap(), vec!["a", "b", "a"]);
    }
}
