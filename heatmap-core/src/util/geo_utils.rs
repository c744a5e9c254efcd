use geo::{Area, BoundingRect, MultiPolygon};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

/// a band geometry smaller than this area (in squared coordinate units) is
/// considered empty. overlay results that touch only along an edge come back as
/// zero-area slivers.
pub const EMPTY_AREA_TOLERANCE: f64 = 1e-12;

/// true when a polygonal region has no remaining area
pub fn is_degenerate(geometry: &MultiPolygon<f64>) -> bool {
    geometry.0.is_empty() || geometry.unsigned_area() <= EMPTY_AREA_TOLERANCE
}

/// creates an envelope from a polygonal geometry using its bounding rectangle.
///
/// since an empty geometry has no bounding rectangle, the result may be None
///
/// # Arguments
///
/// * `geometry` - value to create an envelope from
///
/// # Returns
///
/// * an envelope if possible, otherwise None
pub fn get_envelope(geometry: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    geometry.bounding_rect().map(|rect| {
        let (min, max) = (rect.min(), rect.max());
        AABB::from_corners([min.x, min.y], [max.x, max.y])
    })
}

/// spatial index over the bounding boxes of a list of geometries, returning
/// positions into that list.
pub struct EnvelopeIndex {
    rtree: RTree<GeomWithData<Rectangle<[f64; 2]>, usize>>,
}

impl EnvelopeIndex {
    pub fn new<'a, I>(geometries: I) -> EnvelopeIndex
    where
        I: IntoIterator<Item = &'a MultiPolygon<f64>>,
    {
        let entries = geometries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, g)| {
                get_envelope(g).map(|env| {
                    let rect = Rectangle::from_corners(env.lower(), env.upper());
                    GeomWithData::new(rect, idx)
                })
            })
            .collect::<Vec<_>>();
        EnvelopeIndex {
            rtree: RTree::bulk_load(entries),
        }
    }

    /// positions of all indexed geometries whose bounding box overlaps the
    /// bounding box of the query geometry, in ascending order.
    pub fn candidates(&self, query: &MultiPolygon<f64>) -> Vec<usize> {
        match get_envelope(query) {
            None => vec![],
            Some(env) => {
                let mut found = self
                    .rtree
                    .locate_in_envelope_intersecting(&env)
                    .map(|node| node.data)
                    .collect::<Vec<_>>();
                found.sort_unstable();
                found
            }
        }
    }
}
