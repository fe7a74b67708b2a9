pub mod document;
pub mod segmenter;

pub use document::{extract_text, ExtractedDocument, ExtractionError, PageContent};
pub use segmenter::{
    segment_text, Segment, SegmentError, SegmentSummary, SegmentWarning, Segmenter,
    SegmenterConfig, SplitStrategy,
};
