// Copyright 2026 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#[cfg(test)]
mod tests {
    use super::super::fixtures::{sample_assets, sample_catalog, SAMPLE_SOURCE};
    use super::super::search::{search, search_source};
    use super::super::store::{parse_catalog, CatalogStore};
    use super::super::types::{Column, MatchKind};

    fn ids(response: &super::super::types::SearchResponse) -> Vec<&str> {
        response
            .results
            .iter()
            .map(|r| r.record.id.as_str())
            .collect()
    }

    #[test]
    fn test_exact_identifier_match() {
        let catalog = sample_catalog();
        let response = search(&catalog, "PZ0003", &Column::ALL);

        assert_eq!(response.total_matches, 1);
        assert_eq!(response.query, "PZ0003");
        let result = &response.results[0];
        assert_eq!(result.match_type, MatchKind::Exact);
        assert_eq!(result.matched_column, Column::Id);
        assert_eq!(result.matched_value, "PZ0003");
        assert_eq!(result.record.name, "Radiador");
        assert_eq!(result.record.brand, "Chevrolet");
        assert_eq!(result.record.model, "Aveo");
        assert_eq!(result.record.year, 2022);
        assert_eq!(result.record.price, "266.21");
    }

    #[test]
    fn test_case_insensitive_both_passes() {
        let catalog = sample_catalog();

        let exact = search(&catalog, "pz0003", &Column::ALL);
        assert_eq!(exact.total_matches, 1);
        assert_eq!(exact.results[0].match_type, MatchKind::Exact);

        let partial = search(&catalog, "cHeVrO", &Column::ALL);
        assert_eq!(ids(&partial), vec!["PZ0003"]);
        assert_eq!(partial.results[0].match_type, MatchKind::Partial);
        assert_eq!(partial.results[0].matched_column, Column::Brand);
    }

    #[test]
    fn test_partial_matches_when_no_exact() {
        let catalog = sample_catalog();
        let response = search(&catalog, "PZ000", &Column::ALL);

        assert_eq!(response.total_matches, 9);
        assert!(response
            .results
            .iter()
            .all(|r| r.match_type == MatchKind::Partial && r.matched_column == Column::Id));
    }

    #[test]
    fn test_exact_suppression_is_per_column() {
        let catalog = sample_catalog();
        // Model column has an exact "Aveo"; compatibility only a partial one.
        let response = search(&catalog, "aveo", &Column::ALL);

        assert_eq!(ids(&response), vec!["PZ0003", "PZ0005"]);
        assert_eq!(response.results[0].match_type, MatchKind::Exact);
        assert_eq!(response.results[0].matched_column, Column::Model);
        assert_eq!(response.results[1].match_type, MatchKind::Partial);
        assert_eq!(response.results[1].matched_column, Column::Compatibility);
    }

    #[test]
    fn test_exact_suppresses_partial_within_column() {
        let catalog = sample_catalog();
        // "Altima" is an exact model for two rows; no partial model rows leak in
        let response = search(&catalog, "altima", &[Column::Model]);

        assert_eq!(ids(&response), vec!["PZ0001", "PZ0007"]);
        assert!(response
            .results
            .iter()
            .all(|r| r.match_type == MatchKind::Exact));
    }

    #[test]
    fn test_rows_deduplicated_across_columns() {
        let catalog = sample_catalog();
        // PZ0001 matches the name exactly and the description partially
        let response = search(&catalog, "alternador", &Column::ALL);

        assert_eq!(ids(&response), vec!["PZ0001", "PZ0007"]);
        assert_eq!(response.total_matches, 2);
        assert_eq!(response.results[0].matched_column, Column::Name);
    }

    #[test]
    fn test_identical_rows_collapse() {
        let csv = "ID,Nombre de Pieza,Marca de Auto,Modelo,Año,Dimensiones,Fabricante,Precio (MXN),Descripción,Compatibilidad Extra,Estado\n\
                   A1,Faro,Kia,Rio,2020,1x1x1 cm,Hella,10.00,Faro,Rio,Nuevo\n";
        let catalog = parse_catalog("dup.csv", csv.as_bytes()).unwrap();
        // Name and description both equal "Faro"; one row, one result
        let response = search(&catalog, "faro", &Column::ALL);
        assert_eq!(response.total_matches, 1);
    }

    #[test]
    fn test_cell_whitespace_is_not_trimmed() {
        let csv = "ID,Nombre de Pieza,Marca de Auto,Modelo,Año,Dimensiones,Fabricante,Precio (MXN),Descripción,Compatibilidad Extra,Estado\n\
                   \" PZ0003 \",Radiador,Chevrolet,Aveo,2022,29x3x3 cm,ACDelco,266.21,Radiador,Aveo,Nuevo\n";
        let catalog = parse_catalog("padded.csv", csv.as_bytes()).unwrap();

        let response = search(&catalog, "  pz0003 ", &[Column::Id]);
        assert_eq!(response.total_matches, 1);
        assert_eq!(response.results[0].match_type, MatchKind::Partial);
        assert_eq!(response.results[0].matched_value, " PZ0003 ");
    }

    #[test]
    fn test_search_is_deterministic() {
        let catalog = sample_catalog();
        let first = search(&catalog, "ni", &Column::ALL);
        let second = search(&catalog, "ni", &Column::ALL);

        assert_eq!(first.results, second.results);
        assert_eq!(first.total_matches, second.total_matches);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let catalog = sample_catalog();
        assert_eq!(search(&catalog, "", &Column::ALL).total_matches, 0);
        assert_eq!(search(&catalog, "   ", &Column::ALL).total_matches, 0);
    }

    #[test]
    fn test_empty_catalog_has_no_matches() {
        let csv = "ID,Nombre de Pieza,Marca de Auto,Modelo,Año,Dimensiones,Fabricante,Precio (MXN),Descripción,Compatibilidad Extra,Estado\n";
        let catalog = parse_catalog("empty.csv", csv.as_bytes()).unwrap();
        let response = search(&catalog, "PZ0003", &Column::ALL);

        assert_eq!(response.total_matches, 0);
        assert!(response.results.is_empty());
        assert!(response.error.is_none());
    }

    #[test]
    fn test_column_restriction() {
        let catalog = sample_catalog();
        let response = search(&catalog, "2022", &[Column::Id, Column::Name]);
        assert_eq!(response.total_matches, 0);

        let response = search(&catalog, "2022", &[Column::Year]);
        assert_eq!(ids(&response), vec!["PZ0003"]);
    }

    #[test]
    fn test_search_source_records_missing_catalog() {
        let assets = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(assets.path());
        let response = search_source(&store, "missing.csv", "PZ0003", &Column::ALL);

        assert_eq!(response.total_matches, 0);
        let error = response.error.expect("error recorded");
        assert!(error.contains("not found"), "unexpected error: {}", error);
    }

    #[test]
    fn test_search_source_loads_catalog() {
        let assets = sample_assets();
        let store = CatalogStore::new(assets.path());
        let response = search_source(&store, SAMPLE_SOURCE, "PZ0010", &Column::ALL);

        assert_eq!(ids(&response), vec!["PZ0010"]);
        assert!(response.error.is_none());
    }
}
