use {
    crate::*,
    glam::IVec2,
    nom::{
        character::complete::line_ending,
        combinator::map,
        error::Error,
        multi::separated_list1,
        Err, IResult,
    },
};

/// One ash-and-rock pattern from the valley notes.
#[cfg_attr(test, derive(Debug, PartialEq))]
struct Note(Grid2D<Pixel>);

impl Note {
    /// Mismatched cell count for a mirror line between rows `y - 1` and `y`.
    ///
    /// Rows with no partner beyond the near edge are ignored, matching how the reflection is
    /// allowed to run off the pattern.
    fn horizontal_mismatch_count(&self, y: i32) -> usize {
        let dimensions: IVec2 = self.0.dimensions();

        (0_i32..y.min(dimensions.y - y))
            .map(|offset| {
                let above: i32 = y - 1_i32 - offset;
                let below: i32 = y + offset;

                (0_i32..dimensions.x)
                    .filter(|x| {
                        self.0.get(IVec2::new(*x, above)) != self.0.get(IVec2::new(*x, below))
                    })
                    .count()
            })
            .sum()
    }

    /// Mismatched cell count for a mirror line between columns `x - 1` and `x`.
    fn vertical_mismatch_count(&self, x: i32) -> usize {
        let dimensions: IVec2 = self.0.dimensions();

        (0_i32..x.min(dimensions.x - x))
            .map(|offset| {
                let left: i32 = x - 1_i32 - offset;
                let right: i32 = x + offset;

                (0_i32..dimensions.y)
                    .filter(|y| {
                        self.0.get(IVec2::new(left, *y)) != self.0.get(IVec2::new(right, *y))
                    })
                    .count()
            })
            .sum()
    }

    /// Summary of the mirror line whose reflection has exactly `mismatch_count` mismatched cells:
    /// columns left of a vertical line, or 100 times the rows above a horizontal one.
    ///
    /// Question 1 wants a perfect reflection (0); question 2 wants the line revealed by repairing
    /// the single smudge (1), which is necessarily a different line.
    fn try_summarize(&self, mismatch_count: usize) -> Option<u64> {
        let dimensions: IVec2 = self.0.dimensions();

        (1_i32..dimensions.x)
            .find(|x| self.vertical_mismatch_count(*x) == mismatch_count)
            .map(|x| x as u64)
            .or_else(|| {
                (1_i32..dimensions.y)
                    .find(|y| self.horizontal_mismatch_count(*y) == mismatch_count)
                    .map(|y| 100_u64 * y as u64)
            })
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<Note>);

impl Solution {
    fn summary_sum(&self, mismatch_count: usize) -> u64 {
        self.0
            .iter()
            .map(|note| {
                note.try_summarize(mismatch_count)
                    .expect("every note has a mirror line")
            })
            .sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            separated_list1(line_ending, map(Grid2D::parse, Note)),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    /// Sum of the note summaries for perfect reflections.
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.summary_sum(0_usize));
    }

    /// Sum of the note summaries once each note's single smudge is repaired.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.summary_sum(1_usize));
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}
