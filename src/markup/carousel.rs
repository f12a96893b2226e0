//! Carousel region detection.
//!
//! A carousel region is the body span between a `[[IMAGE_CAROUSEL_START]]`
//! marker and the end marker paired with it. Image placeholders inside a
//! region render as slides of one group instead of standalone figures.
//!
//! Pairing scans in document order: each start claims the nearest
//! following end not already claimed by an earlier start. A start left
//! without an end extends to the end of the document; an end left without
//! a start does nothing. Pairs that overlap are merged into one region.

use std::ops::Range;

use super::tokens::{Token, scan};

/// One carousel region of a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselRegion {
    /// Span of the start marker that opens the region.
    pub open: Range<usize>,
    /// Span of the end marker that closes it; `None` runs to end of text.
    pub close: Option<Range<usize>>,
}

impl CarouselRegion {
    /// Interior of the region: strictly after the start marker and
    /// strictly before the end marker.
    pub fn interior(&self, text_len: usize) -> Range<usize> {
        let end = self.close.as_ref().map_or(text_len, |c| c.start);
        self.open.end..end
    }

    fn end_offset(&self) -> usize {
        self.close.as_ref().map_or(usize::MAX, |c| c.end)
    }
}

/// The carousel regions of one body, in document order, non-overlapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarouselRegions {
    regions: Vec<CarouselRegion>,
    text_len: usize,
}

impl CarouselRegions {
    /// Locate every carousel region in `text`.
    pub fn detect(text: &str) -> Self {
        let mut starts = Vec::new();
        let mut ends = Vec::new();
        for located in scan(text) {
            let span = located.offset..located.end();
            match located.token {
                Token::CarouselStart => starts.push(span),
                Token::CarouselEnd => ends.push(span),
                _ => {}
            }
        }

        let mut claimed = vec![false; ends.len()];
        let mut paired: Vec<CarouselRegion> = Vec::with_capacity(starts.len());
        for open in starts {
            let close = ends
                .iter()
                .enumerate()
                .find(|(i, end)| !claimed[*i] && end.start >= open.end)
                .map(|(i, end)| {
                    claimed[i] = true;
                    end.clone()
                });
            paired.push(CarouselRegion { open, close });
        }

        // Starts are visited in order, so regions are sorted by open offset
        let mut regions: Vec<CarouselRegion> = Vec::with_capacity(paired.len());
        for region in paired {
            match regions.last_mut() {
                Some(last) if region.open.start < last.end_offset() => {
                    if region.end_offset() > last.end_offset() {
                        last.close = region.close;
                    }
                }
                _ => regions.push(region),
            }
        }

        Self {
            regions,
            text_len: text.len(),
        }
    }

    /// Whether the byte at `offset` lies strictly inside some region.
    pub fn contains(&self, offset: usize) -> bool {
        self.region_at(offset).is_some()
    }

    /// The region whose interior holds `offset`.
    pub fn region_at(&self, offset: usize) -> Option<&CarouselRegion> {
        self.regions
            .iter()
            .find(|r| r.interior(self.text_len).contains(&offset))
    }

    /// Whether a start marker at `offset` opens a region.
    pub fn opens_at(&self, offset: usize) -> bool {
        self.regions.iter().any(|r| r.open.start == offset)
    }

    /// Whether an end marker at `offset` closes a region.
    pub fn closes_at(&self, offset: usize) -> bool {
        self.regions
            .iter()
            .any(|r| r.close.as_ref().is_some_and(|c| c.start == offset))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarouselRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "[[IMAGE_CAROUSEL_START]]";
    const END: &str = "[[IMAGE_CAROUSEL_END]]";

    #[test]
    fn test_single_pair() {
        let body = format!("intro {START}[[IMAGE_1]]{END} outro");
        let regions = CarouselRegions::detect(&body);

        assert_eq!(regions.len(), 1);
        let image_at = body.find("[[IMAGE_1]]").unwrap();
        assert!(regions.contains(image_at));
        assert!(!regions.contains(body.find("intro").unwrap()));
        assert!(!regions.contains(body.find("outro").unwrap()));
    }

    #[test]
    fn test_two_separate_pairs() {
        let body = format!("{START}a{END} b {START}c{END}");
        let regions = CarouselRegions::detect(&body);

        assert_eq!(regions.len(), 2);
        assert!(regions.contains(body.find('a').unwrap()));
        assert!(!regions.contains(body.find(" b ").unwrap() + 1));
        assert!(regions.contains(body.find('c').unwrap()));
    }

    #[test]
    fn test_unpaired_start_runs_to_end() {
        let body = format!("x {START} [[IMAGE_2]] tail");
        let regions = CarouselRegions::detect(&body);

        assert_eq!(regions.len(), 1);
        assert!(regions.iter().next().unwrap().close.is_none());
        assert!(regions.contains(body.find("tail").unwrap()));
        assert!(!regions.contains(0));
    }

    #[test]
    fn test_unpaired_end_is_noop() {
        let body = format!("[[IMAGE_1]] {END} [[IMAGE_2]]");
        let regions = CarouselRegions::detect(&body);

        assert!(regions.is_empty());
        assert!(!regions.closes_at(body.find(END).unwrap()));
    }

    #[test]
    fn test_end_before_start_not_claimed() {
        let body = format!("{END} {START} [[IMAGE_1]]");
        let regions = CarouselRegions::detect(&body);

        assert_eq!(regions.len(), 1);
        assert!(regions.iter().next().unwrap().close.is_none());
        assert!(regions.contains(body.find("[[IMAGE_1]]").unwrap()));
    }

    #[test]
    fn test_interleaved_pairs_merge() {
        // S1 pairs with E1, S2 with E2; the overlapping spans become one region
        let body = format!("{START} a {START} b {END} c {END} d");
        let regions = CarouselRegions::detect(&body);

        assert_eq!(regions.len(), 1);
        assert!(regions.contains(body.find(" c ").unwrap() + 1));
        assert!(!regions.contains(body.find(" d").unwrap() + 1));
        assert!(regions.opens_at(0));
        assert!(!regions.opens_at(body[1..].find(START).unwrap() + 1));
        assert!(regions.closes_at(body.rfind(END).unwrap()));
    }

    #[test]
    fn test_markers_themselves_are_not_inside() {
        let body = format!("{START}{END}");
        let regions = CarouselRegions::detect(&body);

        assert!(!regions.contains(0));
        assert!(!regions.contains(START.len()));
    }

    #[test]
    fn test_no_markers() {
        assert!(CarouselRegions::detect("plain [[IMAGE_1]] text").is_empty());
    }
}
