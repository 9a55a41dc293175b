//! Playback cursor.

use crate::core::{Frame, FrameTable};
use crate::util::{Error, Result};

/// Current position in the telemetry table.
///
/// The frame number and the index of its row always move together: a cursor
/// is only ever replaced as a whole, never patched field by field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    frame: Frame,
    index: usize,
}

impl Cursor {
    /// Cursor on the first recorded frame.
    pub fn start(frames: &FrameTable) -> Self {
        Self { frame: frames.min_frame(), index: 0 }
    }

    /// Current frame number.
    #[inline]
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Row index of the current frame.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cursor positioned on `target`.
    ///
    /// Targets past the last frame are out of range; targets inside a gap of
    /// the recording are not in the data set.
    pub fn seek(frames: &FrameTable, target: Frame) -> Result<Self> {
        if target > frames.max_frame() {
            return Err(Error::OutOfRange { frame: target, max: frames.max_frame() });
        }
        let index = frames.position(target).ok_or(Error::NotInDataSet(target))?;
        Ok(Self { frame: target, index })
    }

    /// Cursor on the next recorded frame, or `self` when already on the last one.
    pub fn next(self, frames: &FrameTable) -> Self {
        match frames.next_frame_after(self.frame) {
            // Rows are sorted and unique, so the next key sits at the next index.
            Some(frame) => Self { frame, index: self.index + 1 },
            None => self,
        }
    }

    /// True on the last recorded frame.
    #[inline]
    pub fn at_end(&self, frames: &FrameTable) -> bool {
        self.frame == frames.max_frame()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FrameRow, FRAME_COLUMNS};

    fn table(frames: &[Frame]) -> FrameTable {
        let mut csv = FRAME_COLUMNS.join(",");
        csv.push('\n');
        for f in frames {
            csv.push_str(&format!("{f},0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0\n"));
        }
        let rows: Vec<FrameRow> = csv::Reader::from_reader(csv.as_bytes())
            .deserialize()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        FrameTable::from_rows("frames.csv", rows).unwrap()
    }

    #[test]
    fn test_step_across_gap() {
        let frames = table(&[1, 2, 3, 5]);
        let mut cursor = Cursor::start(&frames);
        let mut visited = vec![cursor.frame()];
        for _ in 0..5 {
            cursor = cursor.next(&frames);
            visited.push(cursor.frame());
        }
        assert_eq!(visited, vec![1, 2, 3, 5, 5, 5]);
        assert!(cursor.at_end(&frames));
        assert_eq!(cursor.index(), 3);
    }

    #[test]
    fn test_seek() {
        let frames = table(&[1, 2, 3, 5]);

        let cursor = Cursor::seek(&frames, 3).unwrap();
        assert_eq!((cursor.frame(), cursor.index()), (3, 2));
        assert_eq!(cursor.next(&frames).frame(), 5);

        assert!(matches!(Cursor::seek(&frames, 6), Err(Error::OutOfRange { frame: 6, max: 5 })));
        assert!(matches!(Cursor::seek(&frames, 4), Err(Error::NotInDataSet(4))));
        assert!(matches!(Cursor::seek(&frames, 0), Err(Error::NotInDataSet(0))));
    }
}
