use {
    aoc_2023::{solutions, Args},
    clap::Parser,
};

fn main() {
    solutions().run(&Args::parse());
}
