use serde::{Deserialize, Serialize};

use super::model::{LipsyncTrack, MouthCue};

/// The eight canonical mouth-shape codes plus the closed/neutral default.
/// The alphabet matches what the avatar renderer was built against, so the
/// variants serialize as bare letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouthShape {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    /// Closed/neutral mouth; also the target for every unmapped symbol.
    X,
}

impl MouthShape {
    /// Map a Polly viseme symbol to its canonical shape. The table is
    /// many-to-one and case-sensitive ("T" and "t" are distinct upstream
    /// symbols that happen to share a shape; "E" and "e" do not).
    pub fn from_phoneme(symbol: &str) -> Self {
        match symbol {
            "p" => Self::A,
            "t" | "T" | "k" | "i" | "r" | "s" => Self::B,
            "e" => Self::C,
            "a" => Self::D,
            "@" | "E" | "S" => Self::E,
            "u" | "o" | "O" => Self::F,
            "f" => Self::G,
            "l" => Self::H,
            _ => Self::X,
        }
    }
}

/// One speech mark as emitted by the primary backend: a millisecond
/// timestamp, a phoneme/viseme symbol, and (on the final mark only) an
/// explicit duration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VisemeMark {
    pub time: u64,
    pub value: String,
    #[serde(default)]
    pub duration: Option<u64>,
}

/// Normalize an ordered mark timeline into the canonical track.
///
/// Each cue ends where the next mark starts; the final cue ends at its own
/// `time + duration`. The look-ahead rule yields gapless cues regardless of
/// what durations the non-final marks might claim.
pub fn track_from_marks(marks: &[VisemeMark]) -> LipsyncTrack {
    let mut mouth_cues = Vec::with_capacity(marks.len());

    for (i, mark) in marks.iter().enumerate() {
        let end_ms = match marks.get(i + 1) {
            Some(next) => next.time,
            None => mark.time + mark.duration.unwrap_or(0),
        };

        mouth_cues.push(MouthCue {
            start: mark.time as f64 / 1000.0,
            end: end_ms as f64 / 1000.0,
            shape: MouthShape::from_phoneme(&mark.value),
        });
    }

    LipsyncTrack { mouth_cues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mark(time: u64, value: &str, duration: Option<u64>) -> VisemeMark {
        VisemeMark {
            time,
            value: value.to_string(),
            duration,
        }
    }

    #[test]
    fn test_every_table_symbol_maps_into_the_alphabet() {
        let expected = [
            ("p", MouthShape::A),
            ("t", MouthShape::B),
            ("T", MouthShape::B),
            ("k", MouthShape::B),
            ("i", MouthShape::B),
            ("r", MouthShape::B),
            ("s", MouthShape::B),
            ("e", MouthShape::C),
            ("a", MouthShape::D),
            ("@", MouthShape::E),
            ("E", MouthShape::E),
            ("S", MouthShape::E),
            ("u", MouthShape::F),
            ("o", MouthShape::F),
            ("O", MouthShape::F),
            ("f", MouthShape::G),
            ("l", MouthShape::H),
        ];
        for (symbol, shape) in expected {
            assert_eq!(MouthShape::from_phoneme(symbol), shape, "symbol {symbol}");
        }
    }

    #[test]
    fn test_unknown_symbols_map_to_neutral_never_error() {
        for symbol in ["sil", "z", "", "P", "uh", "?"] {
            assert_eq!(MouthShape::from_phoneme(symbol), MouthShape::X);
        }
    }

    #[test]
    fn test_cue_end_is_next_mark_start() {
        let marks = vec![
            mark(0, "p", None),
            mark(120, "a", None),
            mark(250, "s", Some(80)),
        ];
        let track = track_from_marks(&marks);

        assert_eq!(track.mouth_cues.len(), 3);
        assert_eq!(track.mouth_cues[0].start, 0.0);
        assert_eq!(track.mouth_cues[0].end, 0.12);
        assert_eq!(track.mouth_cues[1].start, 0.12);
        assert_eq!(track.mouth_cues[1].end, 0.25);
        // Final cue uses its own declared duration.
        assert_eq!(track.mouth_cues[2].start, 0.25);
        assert_eq!(track.mouth_cues[2].end, 0.33);
    }

    #[test]
    fn test_two_mark_fixture_with_explicit_durations() {
        // Non-final durations are ignored in favor of the next mark's start.
        let marks = vec![mark(0, "p", Some(100)), mark(100, "a", Some(150))];
        let track = track_from_marks(&marks);

        assert_eq!(
            track.mouth_cues,
            vec![
                MouthCue {
                    start: 0.0,
                    end: 0.1,
                    shape: MouthShape::A,
                },
                MouthCue {
                    start: 0.1,
                    end: 0.25,
                    shape: MouthShape::D,
                },
            ]
        );
    }

    #[test]
    fn test_single_mark_uses_own_duration() {
        let track = track_from_marks(&[mark(40, "f", Some(60))]);
        assert_eq!(track.mouth_cues.len(), 1);
        assert_eq!(track.mouth_cues[0].start, 0.04);
        assert_eq!(track.mouth_cues[0].end, 0.1);
        assert_eq!(track.mouth_cues[0].shape, MouthShape::G);
    }

    #[test]
    fn test_final_mark_without_duration_closes_at_its_start() {
        let track = track_from_marks(&[mark(0, "p", None), mark(100, "a", None)]);
        assert_eq!(track.mouth_cues[1].start, 0.1);
        assert_eq!(track.mouth_cues[1].end, 0.1);
    }

    #[test]
    fn test_empty_timeline_yields_empty_track() {
        let track = track_from_marks(&[]);
        assert!(track.mouth_cues.is_empty());
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let marks = vec![
            mark(0, "k", None),
            mark(90, "@", None),
            mark(200, "O", Some(110)),
        ];
        assert_eq!(track_from_marks(&marks), track_from_marks(&marks));
    }
}
