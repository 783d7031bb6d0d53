use {
    crate::*,
    nom::{
        bytes::complete::tag,
        character::complete::line_ending,
        combinator::{map, opt, verify},
        error::Error,
        multi::{many1, separated_list1},
        sequence::{separated_pair, terminated},
        Err, IResult,
    },
    std::{
        collections::HashMap,
        fmt::{Display, Formatter, Result as FmtResult, Write},
    },
};

define_cell! {
    #[repr(u8)]
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum SpringState {
        Operational = OPERATIONAL = b'.',
        Damaged = DAMAGED = b'#',
        Unknown = UNKNOWN = b'?',
    }
}

impl From<SpringState> for char {
    fn from(value: SpringState) -> Self {
        value as u8 as char
    }
}

/// One row of the condition records: the (partially unknown) spring states, and the lengths of the
/// contiguous damaged runs the row is known to contain, in order.
#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone)]
struct ConditionRecord {
    springs: Vec<SpringState>,
    damaged_run_lens: Vec<u8>,
}

impl ConditionRecord {
    const UNFOLD_REPETITIONS: usize = 5_usize;

    /// Five copies of the springs joined by single `Unknown` cells, with the damaged run lengths
    /// repeated five times.
    fn unfold(&self) -> Self {
        let mut springs: Vec<SpringState> = Vec::with_capacity(
            Self::UNFOLD_REPETITIONS * self.springs.len() + Self::UNFOLD_REPETITIONS - 1_usize,
        );

        for repetition in 0_usize..Self::UNFOLD_REPETITIONS {
            if repetition != 0_usize {
                springs.push(SpringState::Unknown);
            }

            springs.extend_from_slice(&self.springs);
        }

        Self {
            springs,
            damaged_run_lens: self.damaged_run_lens.repeat(Self::UNFOLD_REPETITIONS),
        }
    }

    fn arrangement_count(&self) -> u64 {
        ArrangementCounter::new(self).count()
    }
}

impl Display for ConditionRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for spring in self.springs.iter().copied() {
            f.write_char(spring.into())?;
        }

        let mut separator: char = ' ';

        for damaged_run_len in self.damaged_run_lens.iter() {
            write!(f, "{separator}{damaged_run_len}")?;
            separator = ',';
        }

        Ok(())
    }
}

impl Parse for ConditionRecord {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            separated_pair(
                many1(SpringState::parse),
                tag(" "),
                separated_list1(
                    tag(","),
                    verify(parse_integer::<u8>, |damaged_run_len: &u8| {
                        *damaged_run_len > 0_u8
                    }),
                ),
            ),
            |(springs, damaged_run_lens)| Self {
                springs,
                damaged_run_lens,
            },
        )(input)
    }
}

/// Memoized top-down counter of the valid resolutions of one record's unknown springs.
///
/// Subproblems are suffixes of the record: the memo key is the pair of a start offset into the
/// spring slice and an index into the damaged run lengths. The recursion only ever advances both
/// cursors forward, so the pair identifies a subproblem exactly and no string keys are needed. The
/// cache lives and dies with one record; its keys would be meaningless for any other record.
struct ArrangementCounter<'r> {
    springs: &'r [SpringState],
    damaged_run_lens: &'r [u8],
    counts: HashMap<(usize, usize), u64>,
}

impl<'r> ArrangementCounter<'r> {
    fn new(record: &'r ConditionRecord) -> Self {
        Self {
            springs: &record.springs,
            damaged_run_lens: &record.damaged_run_lens,
            counts: HashMap::new(),
        }
    }

    fn count(&mut self) -> u64 {
        self.count_suffix(0_usize, 0_usize)
    }

    fn count_suffix(&mut self, springs_start: usize, run_len_index: usize) -> u64 {
        // Placing a run at the end of the springs leaves a start cursor one past the slice.
        let springs_start: usize = springs_start.min(self.springs.len());
        let key: (usize, usize) = (springs_start, run_len_index);

        if let Some(count) = self.counts.get(&key) {
            return *count;
        }

        let springs: &[SpringState] = &self.springs[springs_start..];

        let count: u64 = if run_len_index == self.damaged_run_lens.len() {
            // All remaining unknowns resolve to operational; only a fixed damaged spring is
            // unaccountable.
            springs
                .iter()
                .all(|spring| *spring != SpringState::Damaged) as u64
        } else {
            let run_len: usize = self.damaged_run_lens[run_len_index] as usize;
            let mut count: u64 = 0_u64;

            // Try each start offset for the next damaged run, left to right. The loop ends either
            // when the offset's cell is fixed damaged (that cell must open the current run, so no
            // later offset is legal) or when offsets run out.
            for run_start in 0_usize..springs.len() {
                let run_end: usize = run_start + run_len;

                debug_assert!(
                    run_start == 0_usize || springs[run_start - 1_usize] != SpringState::Damaged
                );

                if run_end <= springs.len()
                    && springs[run_start..run_end]
                        .iter()
                        .all(|spring| *spring != SpringState::Operational)
                    && springs
                        .get(run_end)
                        .map_or(true, |spring| *spring != SpringState::Damaged)
                {
                    // Skip the run plus its mandatory trailing separator.
                    count += self.count_suffix(
                        springs_start + run_end + 1_usize,
                        run_len_index + 1_usize,
                    );
                }

                if springs[run_start] == SpringState::Damaged {
                    break;
                }
            }

            count
        };

        self.counts.insert(key, count);

        count
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct Solution(Vec<ConditionRecord>);

impl Solution {
    fn iter_arrangement_counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().map(ConditionRecord::arrangement_count)
    }

    fn arrangement_count_sum(&self) -> u64 {
        self.iter_arrangement_counts().sum()
    }

    fn unfolded_arrangement_count_sum(&self) -> u64 {
        self.0
            .iter()
            .map(|record| record.unfold().arrangement_count())
            .sum()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            many1(terminated(ConditionRecord::parse, opt(line_ending))),
            Self,
        )(input)
    }
}

impl RunQuestions for Solution {
    /// Sum of the arrangement counts of the records as parsed.
    fn q1_internal(&mut self, args: &QuestionArgs) {
        if args.verbose {
            dbg!(self.iter_arrangement_counts().collect::<Vec<u64>>());
        }

        dbg!(self.arrangement_count_sum());
    }

    /// Sum of the arrangement counts after unfolding each record five-fold.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.unfolded_arrangement_count_sum());
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
        ???.### 1,1,3\n\
        .??..??...?##. 1,1,3\n\
        ?#?#?#?#?#?#?#? 1,3,1,6\n\
        ????.#...#... 4,1,1\n\
        ????.######..#####. 1,6,5\n\
        ?###???????? 3,2,1\n";

    fn record(record_str: &str) -> ConditionRecord {
        ConditionRecord::parse(record_str).unwrap().1
    }

    fn solution() -> &'static Solution {
        use SpringState::{Damaged as D, Operational as O, Unknown as U};

        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| {
            Solution(vec![
                ConditionRecord {
                    springs: vec![U, U, U, O, D, D, D],
                    damaged_run_lens: vec![1, 1, 3],
                },
                ConditionRecord {
                    springs: vec![O, U, U, O, O, U, U, O, O, O, U, D, D, O],
                    damaged_run_lens: vec![1, 1, 3],
                },
                ConditionRecord {
                    springs: vec![U, D, U, D, U, D, U, D, U, D, U, D, U, D, U],
                    damaged_run_lens: vec![1, 3, 1, 6],
                },
                ConditionRecord {
                    springs: vec![U, U, U, U, O, D, O, O, O, D, O, O, O],
                    damaged_run_lens: vec![4, 1, 1],
                },
                ConditionRecord {
                    springs: vec![U, U, U, U, O, D, D, D, D, D, D, O, O, D, D, D, D, D, O],
                    damaged_run_lens: vec![1, 6, 5],
                },
                ConditionRecord {
                    springs: vec![U, D, D, D, U, U, U, U, U, U, U, U],
                    damaged_run_lens: vec![3, 2, 1],
                },
            ])
        })
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(Solution::try_from(SOLUTION_STR).as_ref(), Ok(solution()));
    }

    #[test]
    fn test_invalid_records_fail_to_parse() {
        // A zero-length damaged run is malformed.
        assert!(Solution::try_from("??. 0,1").is_err());

        // So is a pattern with a character outside `.#?`.
        assert!(ConditionRecord::parse("?!?.### 1,1,3").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for line in SOLUTION_STR.lines() {
            assert_eq!(record(line).to_string(), line);
        }
    }

    #[test]
    fn test_empty_run_lens_base_case() {
        // With no runs left, a suffix counts 1 iff it contains no fixed damaged spring. An
        // all-unknown suffix resolves to all-operational.
        for (springs_str, count) in [("...", 1_u64), ("..#..", 0_u64), ("???", 1_u64)] {
            let mut record: ConditionRecord = record(&format!("{springs_str} 1"));

            record.damaged_run_lens.clear();

            assert_eq!(record.arrangement_count(), count);
        }
    }

    #[test]
    fn test_overlong_run_lens_count_zero() {
        // A run spec needing more space than the springs provide is a zero count, not an error.
        assert_eq!(record("??? 4").arrangement_count(), 0_u64);
        assert_eq!(record("?.? 1,1,1").arrangement_count(), 0_u64);
    }

    #[test]
    fn test_arrangement_counts() {
        assert_eq!(
            solution().iter_arrangement_counts().collect::<Vec<u64>>(),
            vec![1_u64, 4_u64, 1_u64, 1_u64, 4_u64, 10_u64]
        );
        assert_eq!(solution().arrangement_count_sum(), 21_u64);
    }

    #[test]
    fn test_unfold() {
        assert_eq!(record(".# 1").unfold(), record(".#?.#?.#?.#?.# 1,1,1,1,1"));
        assert_eq!(
            record("???.### 1,1,3").unfold(),
            record("???.###????.###????.###????.###????.### 1,1,3,1,1,3,1,1,3,1,1,3,1,1,3")
        );
    }

    #[test]
    fn test_unfolded_arrangement_counts() {
        assert_eq!(
            solution()
                .0
                .iter()
                .map(|record| record.unfold().arrangement_count())
                .collect::<Vec<u64>>(),
            vec![1_u64, 16384_u64, 1_u64, 16_u64, 2500_u64, 506250_u64]
        );
        assert_eq!(solution().unfolded_arrangement_count_sum(), 525152_u64);
    }

    #[test]
    fn test_resolving_an_unknown_partitions_the_count() {
        // Fixing one unknown spring either way splits the arrangements into two disjoint sets, so
        // each fixed count never exceeds the unknown one.
        for record in solution().0.iter() {
            let count: u64 = record.arrangement_count();

            for (index, spring) in record.springs.iter().copied().enumerate() {
                if spring != SpringState::Unknown {
                    continue;
                }

                let mut operational: ConditionRecord = record.clone();
                let mut damaged: ConditionRecord = record.clone();

                operational.springs[index] = SpringState::Operational;
                damaged.springs[index] = SpringState::Damaged;

                let operational_count: u64 = operational.arrangement_count();
                let damaged_count: u64 = damaged.arrangement_count();

                assert!(operational_count <= count);
                assert!(damaged_count <= count);
                assert_eq!(operational_count + damaged_count, count);
            }
        }
    }

    #[test]
    fn test_memoization_is_transparent() {
        for record in solution().0.iter() {
            let mut counter: ArrangementCounter = ArrangementCounter::new(record);
            let count: u64 = counter.count();

            // A warm cache returns the same count as a cold one.
            assert_eq!(counter.count(), count);
            assert_eq!(ArrangementCounter::new(record).count(), count);
        }
    }
}
