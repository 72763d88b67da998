use model::fetch::SourceFilter;

/// The set of sources one fetch run visits, in order. `All` is a single
/// unfiltered pass over the whole collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSelection {
    All,
    Devices(Vec<String>),
}

impl SourceSelection {
    /// Builds a selection from user supplied device ids. Blank entries are
    /// dropped; no ids at all means the whole collection.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids
            .into_iter()
            .map(Into::into)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            SourceSelection::All
        } else {
            SourceSelection::Devices(ids)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, SourceSelection::All)
    }

    /// One filter per pass, preserving the configured order.
    pub fn filters(&self) -> Vec<SourceFilter> {
        match self {
            SourceSelection::All => vec![SourceFilter::Unfiltered],
            SourceSelection::Devices(ids) => {
                ids.iter().cloned().map(SourceFilter::Device).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_ids_collapse_to_all() {
        assert!(SourceSelection::from_ids(Vec::<String>::new()).is_all());
        assert!(SourceSelection::from_ids(["", "  "]).is_all());
        assert_eq!(
            SourceSelection::from_ids(Vec::<String>::new()).filters(),
            vec![SourceFilter::Unfiltered]
        );
    }

    #[test]
    fn device_order_is_preserved() {
        let selection = SourceSelection::from_ids(["d2", " d1 ", "d3"]);
        assert_eq!(
            selection.filters(),
            vec![
                SourceFilter::Device("d2".into()),
                SourceFilter::Device("d1".into()),
                SourceFilter::Device("d3".into()),
            ]
        );
    }
}
