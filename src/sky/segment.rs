//! Run-length segmentation of labelled samples into contiguous intervals.
//!
//! A [`Segmenter`] is fed samples in time order. It holds exactly one open
//! candidate (label and start instant); when the label changes the candidate is
//! closed at the new sample's timestamp and replaced by a fresh one starting at
//! that same instant. [`Segmenter::finish`] closes the last candidate at the
//! final sample, so the produced intervals tile the sampled span with no gaps,
//! no overlaps and no two neighbours sharing a label.

use chrono::NaiveDateTime;

/// A closed run of identically labelled samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<L, A> {
    pub label: L,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Auxiliary value observed at the sample that closed the run.
    pub aux: A,
}

/// The interval still being extended.
#[derive(Debug, Clone, Copy)]
struct Candidate<L> {
    label: L,
    start: NaiveDateTime,
}

/// Incremental segmenter over `(timestamp, label, aux)` samples.
#[derive(Debug)]
pub struct Segmenter<L, A> {
    open: Option<Candidate<L>>,
    last: Option<(NaiveDateTime, A)>,
    closed: Vec<Segment<L, A>>,
}

impl<L, A> Default for Segmenter<L, A> {
    fn default() -> Self {
        Self {
            open: None,
            last: None,
            closed: Vec::new(),
        }
    }
}

impl<L: Copy + PartialEq, A: Clone> Segmenter<L, A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next sample. Timestamps are expected in sampling order.
    pub fn push(&mut self, timestamp: NaiveDateTime, label: L, aux: A) {
        match self.open {
            None => {
                self.open = Some(Candidate {
                    label,
                    start: timestamp,
                });
            }
            Some(candidate) if candidate.label != label => {
                // The transition is attributed to the first sample showing the new label
                self.closed.push(Segment {
                    label: candidate.label,
                    start: candidate.start,
                    end: timestamp,
                    aux: aux.clone(),
                });
                self.open = Some(Candidate {
                    label,
                    start: timestamp,
                });
            }
            Some(_) => {}
        }
        self.last = Some((timestamp, aux));
    }

    /// Close the open candidate at the last sample and return all intervals.
    ///
    /// Returns an empty list when no sample was pushed.
    pub fn finish(mut self) -> Vec<Segment<L, A>> {
        if let (Some(candidate), Some((end, aux))) = (self.open.take(), self.last.take()) {
            self.closed.push(Segment {
                label: candidate.label,
                start: candidate.start,
                end,
                aux,
            });
        }
        self.closed
    }
}

/// Segment a whole slice in one pass.
///
/// `timestamp`, `label` and `aux` extract the three ingredients from each
/// item; the same function serves the sun, moon and sky tracks.
pub fn segment<T, L, A>(
    items: &[T],
    timestamp: impl Fn(&T) -> NaiveDateTime,
    label: impl Fn(&T) -> L,
    aux: impl Fn(&T) -> A,
) -> Vec<Segment<L, A>>
where
    L: Copy + PartialEq,
    A: Clone,
{
    let mut segmenter = Segmenter::new();
    for item in items {
        segmenter.push(timestamp(item), label(item), aux(item));
    }
    segmenter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(minute: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + chrono::Duration::minutes(minute)
    }

    fn run(labels: &[char]) -> Vec<Segment<char, usize>> {
        let items: Vec<(i64, char, usize)> = labels
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as i64 * 10, c, i))
            .collect();
        segment(&items, |s| at(s.0), |s| s.1, |s| s.2)
    }

    #[test]
    fn test_constant_label_yields_single_interval() {
        let segments = run(&['a', 'a', 'a', 'a']);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, at(0));
        assert_eq!(segments[0].end, at(30));
        assert_eq!(segments[0].aux, 3);
    }

    #[test]
    fn test_transitions_close_at_new_sample() {
        let segments = run(&['a', 'a', 'b', 'b', 'b', 'a']);
        let labels: Vec<char> = segments.iter().map(|s| s.label).collect();
        assert_eq!(labels, vec!['a', 'b', 'a']);

        assert_eq!((segments[0].start, segments[0].end), (at(0), at(20)));
        assert_eq!((segments[1].start, segments[1].end), (at(20), at(50)));
        // Final run is a single sample: closes at its own timestamp
        assert_eq!((segments[2].start, segments[2].end), (at(50), at(50)));
    }

    #[test]
    fn test_aux_taken_from_closing_sample() {
        let segments = run(&['a', 'a', 'b', 'b']);
        assert_eq!(segments[0].aux, 2); // sample that opened 'b'
        assert_eq!(segments[1].aux, 3); // final sample
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let segments = run(&[]);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_contiguous_and_maximal() {
        let segments = run(&['a', 'b', 'b', 'c', 'a', 'a', 'c', 'c', 'c', 'b']);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].label, pair[1].label);
        }
        assert_eq!(segments.first().unwrap().start, at(0));
        assert_eq!(segments.last().unwrap().end, at(90));
    }
}
