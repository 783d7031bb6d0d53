use {
    crate::*,
    glam::IVec2,
    std::ops::Range,
};

/// One byte of the engine schematic. Digits, periods, and symbols are all retained; the parse only
/// rejects bytes that couldn't appear in a schematic.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SchematicCell(u8);

impl SchematicCell {
    const PERIOD: u8 = b'.';
    const GEAR: u8 = b'*';

    fn digit(self) -> Option<u64> {
        (self.0 as char).to_digit(10_u32).map(u64::from)
    }

    fn is_symbol(self) -> bool {
        !self.0.is_ascii_digit() && self.0 != Self::PERIOD
    }

    fn is_gear_candidate(self) -> bool {
        self.0 == Self::GEAR
    }
}

impl TryFrom<char> for SchematicCell {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        value
            .is_ascii_graphic()
            .then_some(Self(value as u8))
            .ok_or(value)
    }
}

/// A maximal horizontal run of digits: one candidate part number.
#[cfg_attr(test, derive(Debug, PartialEq))]
struct NumberSpan {
    y: i32,
    x_range: Range<i32>,
    value: u64,
}

impl NumberSpan {
    /// Whether `pos` falls in the one-cell border around the span (diagonals included).
    fn is_adjacent_to(&self, pos: IVec2) -> bool {
        (self.y - pos.y).abs() <= 1_i32
            && pos.x >= self.x_range.start - 1_i32
            && pos.x <= self.x_range.end
    }
}

pub struct Solution(Grid2D<SchematicCell>);

impl Solution {
    fn number_spans(&self) -> Vec<NumberSpan> {
        let dimensions: IVec2 = self.0.dimensions();
        let mut number_spans: Vec<NumberSpan> = Vec::new();

        for y in 0_i32..dimensions.y {
            let mut x: i32 = 0_i32;

            while x < dimensions.x {
                let x_start: i32 = x;
                let mut value: u64 = 0_u64;

                while let Some(digit) = self
                    .0
                    .get(IVec2::new(x, y))
                    .copied()
                    .and_then(SchematicCell::digit)
                {
                    value = 10_u64 * value + digit;
                    x += 1_i32;
                }

                if x > x_start {
                    number_spans.push(NumberSpan {
                        y,
                        x_range: x_start..x,
                        value,
                    });
                } else {
                    x += 1_i32;
                }
            }
        }

        number_spans
    }

    fn has_adjacent_symbol(&self, number_span: &NumberSpan) -> bool {
        (number_span.y - 1_i32..=number_span.y + 1_i32).any(|y| {
            (number_span.x_range.start - 1_i32..=number_span.x_range.end).any(|x| {
                self.0
                    .get(IVec2::new(x, y))
                    .map_or(false, |cell| cell.is_symbol())
            })
        })
    }

    fn part_number_sum(&self) -> u64 {
        self.number_spans()
            .iter()
            .filter(|number_span| self.has_adjacent_symbol(number_span))
            .map(|number_span| number_span.value)
            .sum()
    }

    fn gear_ratio_sum(&self) -> u64 {
        let number_spans: Vec<NumberSpan> = self.number_spans();

        self.0
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_gear_candidate())
            .map(|(index, _)| {
                let pos: IVec2 = self.0.pos_from_index(index);
                let mut adjacent_values: [u64; 2_usize] = [0_u64; 2_usize];
                let mut adjacent_count: usize = 0_usize;

                for number_span in number_spans
                    .iter()
                    .filter(|number_span| number_span.is_adjacent_to(pos))
                {
                    if adjacent_count < adjacent_values.len() {
                        adjacent_values[adjacent_count] = number_span.value;
                    }

                    adjacent_count += 1_usize;
                }

                // A gear is a `*` adjacent to exactly two part numbers.
                if adjacent_count == 2_usize {
                    adjacent_values[0_usize] * adjacent_values[1_usize]
                } else {
                    0_u64
                }
            })
            .sum()
    }
}

impl RunQuestions for Solution {
    /// Sum of the numbers adjacent to at least one symbol.
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.part_number_sum());
    }

    /// Sum of the products of the number pairs flanking each gear.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.gear_ratio_sum());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = GridParseError<'i, char>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        input.try_into().map(Self)
    }
}
