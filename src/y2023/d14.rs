use {
    crate::*,
    glam::IVec2,
    nom::{combinator::map, error::Error, Err, IResult},
    std::collections::HashMap,
};

define_cell! {
    #[repr(u8)]
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    enum PlatformCell {
        Empty = EMPTY = b'.',
        CubeRock = CUBE_ROCK = b'#',
        RoundRock = ROUND_ROCK = b'O',
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
#[derive(Clone)]
pub struct Solution(Grid2D<PlatformCell>);

impl Solution {
    const SPIN_CYCLES: usize = 1_000_000_000_usize;

    /// The tilt order of one spin cycle.
    const SPIN_CYCLE_DIRS: [Direction; 4_usize] = [
        Direction::North,
        Direction::West,
        Direction::South,
        Direction::East,
    ];

    /// Rolls every round rock as far toward `dir` as it will go.
    ///
    /// Lanes start on the `dir` edge and are walked away from it, so each rock's destination is
    /// settled before the rocks behind it are visited.
    fn tilt(&mut self, dir: Direction) {
        let lane_dir: Direction = dir.rev();

        for lane_start in CellIter2D::corner(&self.0, dir.next()) {
            let mut open_pos: IVec2 = lane_start;

            for pos in CellIter2D::until_boundary(&self.0, lane_start, lane_dir) {
                match *self.0.get(pos).unwrap() {
                    PlatformCell::Empty => (),
                    PlatformCell::CubeRock => open_pos = pos + lane_dir.vec(),
                    PlatformCell::RoundRock => {
                        *self.0.get_mut(pos).unwrap() = PlatformCell::Empty;
                        *self.0.get_mut(open_pos).unwrap() = PlatformCell::RoundRock;
                        open_pos += lane_dir.vec();
                    }
                }
            }
        }
    }

    fn spin_cycle(&mut self) {
        for dir in Self::SPIN_CYCLE_DIRS {
            self.tilt(dir);
        }
    }

    /// Sum over the round rocks of their row count to the south edge, inclusive.
    fn north_beam_load(&self) -> u64 {
        let height: i32 = self.0.dimensions().y;

        self.0
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, cell)| **cell == PlatformCell::RoundRock)
            .map(|(index, _)| (height - self.0.pos_from_index(index).y) as u64)
            .sum()
    }

    fn north_beam_load_after_tilting_north(&self) -> u64 {
        let mut platform: Self = self.clone();

        platform.tilt(Direction::North);

        platform.north_beam_load()
    }

    /// Runs `spin_cycles` spin cycles, shortcutting through the loop the platform state inevitably
    /// falls into, then reports the north beam load.
    fn north_beam_load_after_spin_cycles(&self, spin_cycles: usize) -> u64 {
        let mut platform: Self = self.clone();
        let mut cycles_by_state: HashMap<String, usize> = HashMap::new();
        let mut cycle: usize = 0_usize;

        while cycle < spin_cycles {
            if let Some(loop_start) = cycles_by_state.insert(String::from(&platform.0), cycle) {
                let loop_len: usize = cycle - loop_start;

                for _ in 0_usize..(spin_cycles - cycle) % loop_len {
                    platform.spin_cycle();
                }

                return platform.north_beam_load();
            }

            platform.spin_cycle();
            cycle += 1_usize;
        }

        platform.north_beam_load()
    }
}

impl Parse for Solution {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(Grid2D::parse, Self)(input)
    }
}

impl RunQuestions for Solution {
    /// North beam load after a single tilt north.
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.north_beam_load_after_tilting_north());
    }

    /// North beam load after a billion spin cycles.
    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.north_beam_load_after_spin_cycles(Self::SPIN_CYCLES));
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
        O....#....\n\
        O.OO#....#\n\
        .....##...\n\
        OO.#O....O\n\
        .O.....O#.\n\
        O.#..O.#.#\n\
        ..O..#O..O\n\
        .......O..\n\
        #....###..\n\
        #OO..#....\n";

    const TILTED_NORTH_STR: &'static str = "\
        OOOO.#.O..\n\
        OO..#....#\n\
        OO..O##..O\n\
        O..#.OO...\n\
        ........#.\n\
        ..#....#.#\n\
        ..O..#.O.O\n\
        ..O.......\n\
        #....###..\n\
        #....#....\n";

    const SPIN_CYCLE_STRS: [&'static str; 3_usize] = [
        "\
        .....#....\n\
        ....#...O#\n\
        ...OO##...\n\
        .OO#......\n\
        .....OOO#.\n\
        .O#...O#.#\n\
        ....O#....\n\
        ......OOOO\n\
        #...O###..\n\
        #..OO#....\n",
        "\
        .....#....\n\
        ....#...O#\n\
        .....##...\n\
        ..O#......\n\
        .....OOO#.\n\
        .O#...O#.#\n\
        ....O#...O\n\
        .......OOO\n\
        #..OO###..\n\
        #.OOO#...O\n",
        "\
        .....#....\n\
        ....#...O#\n\
        .....##...\n\
        ..O#......\n\
        .....OOO#.\n\
        .O#...O#.#\n\
        ....O#...O\n\
        .......OOO\n\
        #...O###.O\n\
        #.OOO#...O\n",
    ];

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.dimensions(), IVec2::new(10_i32, 10_i32));
        assert_eq!(String::from(&solution.0), SOLUTION_STR);
    }

    #[test]
    fn test_tilt_north() {
        let mut platform: Solution = solution().clone();

        platform.tilt(Direction::North);

        let tilted_north: Solution = TILTED_NORTH_STR.try_into().unwrap();

        assert_eq!(platform, tilted_north);
    }

    #[test]
    fn test_north_beam_load_after_tilting_north() {
        assert_eq!(solution().north_beam_load_after_tilting_north(), 136_u64);
    }

    #[test]
    fn test_spin_cycle() {
        let mut platform: Solution = solution().clone();

        for spin_cycle_str in SPIN_CYCLE_STRS {
            platform.spin_cycle();

            let expected: Solution = spin_cycle_str.try_into().unwrap();

            assert_eq!(platform, expected);
        }
    }

    #[test]
    fn test_north_beam_load_after_spin_cycles() {
        assert_eq!(
            solution().north_beam_load_after_spin_cycles(Solution::SPIN_CYCLES),
            64_u64
        );
    }
}
