use {
    crate::*,
    nom::{
        character::complete::{alphanumeric1, line_ending},
        combinator::{map, opt},
        error::Error,
        multi::many1,
        sequence::terminated,
        Err, IResult,
    },
};

const SPELLED_DIGITS: [&str; 9_usize] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// One line of the amended calibration document: alphanumeric noise hiding digits.
#[cfg_attr(test, derive(Debug, PartialEq))]
struct CalibrationLine(String);

impl CalibrationLine {
    fn iter_digits(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.chars().filter_map(|c| c.to_digit(10_u32))
    }

    /// Digits, either literal or spelled out, in left-to-right order.
    ///
    /// Spelled digits may overlap ("eightwo" holds both 8 and 2), so every suffix is inspected
    /// rather than consuming matches.
    fn iter_digits_and_spelled_digits(&self) -> impl Iterator<Item = u32> + '_ {
        (0_usize..self.0.len()).filter_map(|start| {
            let suffix: &str = &self.0[start..];

            suffix
                .chars()
                .next()
                .and_then(|c| c.to_digit(10_u32))
                .or_else(|| {
                    SPELLED_DIGITS
                        .iter()
                        .position(|spelled_digit| suffix.starts_with(spelled_digit))
                        .map(|index| index as u32 + 1_u32)
                })
        })
    }

    /// Ten times the first digit plus the last digit, or `None` for a digitless line.
    fn calibration_value<I: Iterator<Item = u32>>(mut digits: I) -> Option<u32> {
        digits.next().map(|first_digit| {
            10_u32 * first_digit + digits.last().unwrap_or(first_digit)
        })
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<CalibrationLine>);

impl Solution {
    fn calibration_value_sum(&self) -> u32 {
        self.0
            .iter()
            .filter_map(|line| CalibrationLine::calibration_value(line.iter_digits()))
            .sum()
    }

    fn spelled_calibration_value_sum(&self) -> u32 {
        self.0
            .iter()
            .filter_map(|line| {
                CalibrationLine::calibration_value(line.iter_digits_and_spelled_digits())
            })
            .sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many1(terminated(
                map(alphanumeric1, |line: &str| CalibrationLine(line.into())),
                opt(line_ending),
            )),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    /// Sum of the two-digit values formed by each line's first and last literal digit.
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.calibration_value_sum());
    }

    /// As question 1, but spelled-out digits count too.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.spelled_calibration_value_sum());
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = Err<Error<&'i str>>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        Ok(Self::parse(input)?.1)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &'static str = "\
        1abc2\n\
        pqr3stu8vwx\n\
        a1b2c3d4e5f\n\
        treb7uchet\n";
    const SPELLED_SOLUTION_STR: &'static str = "\
        two1nine\n\
        eightwothree\n\
        abcone2threexyz\n\
        xtwone3four\n\
        4nineeightseven2\n\
        zoneight234\n\
        7pqrstsixteen\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| {
            Solution(
                ["1abc2", "pqr3stu8vwx", "a1b2c3d4e5f", "treb7uchet"]
                    .into_iter()
                    .map(|line| CalibrationLine(line.into()))
                    .collect(),
            )
        })
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(Solution::try_from(SOLUTION_STR).as_ref(), Ok(solution()));
    }

    #[test]
    fn test_calibration_value_sum() {
        assert_eq!(solution().calibration_value_sum(), 142_u32);
    }

    #[test]
    fn test_spelled_calibration_value_sum() {
        let solution: Solution = SPELLED_SOLUTION_STR.try_into().unwrap();

        assert_eq!(
            solution
                .0
                .iter()
                .filter_map(|line| {
                    CalibrationLine::calibration_value(line.iter_digits_and_spelled_digits())
                })
                .collect::<Vec<u32>>(),
            vec![29_u32, 83_u32, 13_u32, 24_u32, 42_u32, 14_u32, 76_u32]
        );
        assert_eq!(solution.spelled_calibration_value_sum(), 281_u32);
    }

    #[test]
    fn test_overlapping_spelled_digits() {
        let line: CalibrationLine = CalibrationLine("eightwo".into());

        assert_eq!(
            line.iter_digits_and_spelled_digits().collect::<Vec<u32>>(),
            vec![8_u32, 2_u32]
        );
    }
}
