use std::fmt::{self, Display, Formatter};

use criterion::{measurement::WallTime, BenchmarkGroup, BenchmarkId, Throughput};
use rand::{Rng, SeedableRng};
use incremental_delaunay::{
    DelaunayManager, EdgeFlipManager, HistoryDagLocator, PointLocator, QuadTreeLocator, Vertex,
    WalkLocator, WatsonManager,
};

pub const SEED: &[u8; 32] = b"\xfb\xdc\x4e\xa0\x30\xde\x82\xba\x69\x97\x3c\x52\x49\x4d\x00\xca
\x5c\x21\xa3\x8d\x5c\xf2\x34\x4e\x58\x7d\x80\x16\x66\x23\x30";

pub const RANGE: f64 = 1000.0;

pub fn uniform_distribution(seed: [u8; 32], range: f64) -> impl Iterator<Item = Vertex> {
    let range = rand::distributions::Uniform::new_inclusive(-range, range);
    let mut rng = rand::rngs::StdRng::from_seed(seed);
    std::iter::from_fn(move || Some(Vertex::new(rng.sample(range), rng.sample(range))))
}

pub fn random_walk_distribution(step_size: f64, seed: [u8; 32]) -> impl Iterator<Item = Vertex> {
    let range = rand::distributions::Uniform::new_inclusive(-step_size, step_size);
    let mut last_x = 0.0;
    let mut last_y = 1.0;

    let mut rng = rand::rngs::StdRng::from_seed(seed);
    let step_fn = move || {
        last_x += rng.sample(range);
        last_y += rng.sample(range);

        Some(Vertex::new(last_x, last_y))
    };
    std::iter::from_fn(step_fn)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Algorithm {
    EdgeFlip,
    Watson,
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::EdgeFlip => "edge flip",
            Algorithm::Watson => "watson",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocatorType {
    HistoryDag,
    Walk,
    QuadTree,
}

impl Display for LocatorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LocatorType::HistoryDag => "history dag",
            LocatorType::Walk => "walk",
            LocatorType::QuadTree => "quad tree",
        })
    }
}

impl LocatorType {
    fn create(&self) -> Box<dyn PointLocator> {
        match self {
            LocatorType::HistoryDag => Box::new(HistoryDagLocator::new()),
            LocatorType::Walk => Box::new(WalkLocator::new()),
            LocatorType::QuadTree => Box::new(QuadTreeLocator::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SampleDistribution {
    RandomWalk,
    Uniform,
}

impl Display for SampleDistribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleDistribution::RandomWalk => "locally clustered",
            SampleDistribution::Uniform => "uniformly distributed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreationBenchConfig {
    pub algorithm: Algorithm,
    pub locator_type: LocatorType,
    pub sample_distribution: SampleDistribution,
}

impl CreationBenchConfig {
    pub fn apply(&self, group: &mut BenchmarkGroup<WallTime>, sizes: &[usize]) {
        let name = self.get_name();

        for size in sizes {
            group.throughput(Throughput::Elements(*size as u64));
            group.bench_with_input(BenchmarkId::new(name.clone(), size), &size, |b, &size| {
                let data = self.get_distribution().take(*size).collect::<Vec<_>>();
                b.iter(|| self.triangulate(&data));
            });
        }
    }

    fn get_name(&self) -> String {
        format!(
            "{algorithm} on {locator_type}, {sample_distribution}",
            algorithm = self.algorithm,
            locator_type = self.locator_type,
            sample_distribution = self.sample_distribution
        )
    }

    fn get_distribution(&self) -> Box<dyn Iterator<Item = Vertex>> {
        match self.sample_distribution {
            SampleDistribution::RandomWalk => Box::new(random_walk_distribution(1.0, *SEED)),
            SampleDistribution::Uniform => Box::new(uniform_distribution(*SEED, RANGE)),
        }
    }

    fn triangulate(&self, data: &[Vertex]) -> usize {
        let locator = self.locator_type.create();
        let result = match self.algorithm {
            Algorithm::EdgeFlip => run(EdgeFlipManager::new(locator), data),
            Algorithm::Watson => run(WatsonManager::new(locator), data),
        };
        result.len()
    }
}

fn run<M: DelaunayManager>(mut manager: M, data: &[Vertex]) -> Vec<incremental_delaunay::Triangle> {
    manager.init(data).unwrap();
    manager.triangulation().unwrap()
}
