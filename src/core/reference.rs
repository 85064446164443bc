use crate::models::ReferenceRecord;

/// The three fixed listing sources merged by the model at query time
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCatalog {
    pub source_a: Vec<ReferenceRecord>,
    pub source_b: Vec<ReferenceRecord>,
    pub source_c: Vec<ReferenceRecord>,
}

impl ReferenceCatalog {
    pub fn new(
        source_a: Vec<ReferenceRecord>,
        source_b: Vec<ReferenceRecord>,
        source_c: Vec<ReferenceRecord>,
    ) -> Self {
        Self { source_a, source_b, source_c }
    }

    /// Built-in sample listings for dog grooming services
    pub fn builtin() -> Self {
        Self {
            source_a: vec![
                ReferenceRecord::new("A1", "Pupper Palace", 4.8, 152, "$52", "Call 333-33-333 to booking"),
                ReferenceRecord::new("A2", "The groom room", 4.5, 88, "$80", "Online booking available at booking.com"),
            ],
            source_b: vec![
                ReferenceRecord::new("B1", "Canice Cuts", 4.1, 100, "$87", "Call 555-55-55 to booking"),
                ReferenceRecord::new("B2", "Place Groom Room", 4.2, 70, "$80", "Online booking available at place.com"),
            ],
            source_c: vec![
                ReferenceRecord::new("C1", "Diamond Dogs", 4.6, 90, "$23", "Call 1111-111-11 to booking"),
                ReferenceRecord::new("C2", "Brike Groom Room", 4.2, 70, "$70", "Online booking available at Brike.com"),
            ],
        }
    }

    /// Sources paired with their prompt labels, in A, B, C order
    pub fn sources(&self) -> [(&'static str, &[ReferenceRecord]); 3] {
        [
            ("Source A", &self.source_a),
            ("Source B", &self.source_b),
            ("Source C", &self.source_c),
        ]
    }

    pub fn len(&self) -> usize {
        self.source_a.len() + self.source_b.len() + self.source_c.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReferenceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
