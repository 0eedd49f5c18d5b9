pub mod ensemble;
pub mod prediction;
pub mod verse;

pub use ensemble::EnsembleCombiner;
pub use prediction::{
    ModelContribution, PredictionReport, PredictionResponse, PredictionService,
    EMPTY_INPUT_MESSAGE,
};
pub use verse::{
    CorpusStats, LabelCount, RandomSource, SequenceSource, ThreadRngSource, VerseIndex,
    VerseLookup, VerseSelector,
};
