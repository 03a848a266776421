//! Service-desk ticket pipeline: loads a ticket export into a canonical,
//! chronologically sorted record set, filters it by month, client and desk,
//! and computes the counters and grouped aggregates a dashboard renders.
pub mod analyzer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod parser;

pub use analyzer::{
    apply_filters, build_dashboard, build_filter_domain, DashboardReport, Dimension, FilterDomain,
    FilterSelection, GroupBy, GroupedCounts, SummaryCounters, TypeShare,
};
pub use config::{load_config, DashboardConfig, DateErrorPolicy, MonthNames, UnmappedColorPolicy};
pub use dataset::TicketDataset;
pub use error::AppError;
pub use parser::{LoadReport, RawTable, Ticket};

// ─── E2E Integration Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    const HDR: &str = concat!(
        "TICKET;TIPO DO TICKET;DATA DE CRIAÇÃO DO TICKET;DATA DA SOLUÇÃO;",
        "TEMPO TOTAL DE ATENDIMENTO;NOME FANTASIA DO CLIENTE;NOME DA CATEGORIA PRIMÁRIA;",
        "NOME DA CATEGORIA SECUNDÁRIA;NOME DO TÉCNICO;NOTA DA AVALIAÇÃO;",
        "DESCRIÇÃO DA AVALIAÇÃO;DESCRIÇÃO DA MESA DE TRABALHO;STATUS SLA RESPOSTA;",
        "STATUS SLA SOLUÇÃO;STATUS DO TICKET;PRIORIDADE;COLUNA IGNORADA"
    );

    const ROWS: &[&str] = &[
        "101;Incidente;15/03/2024;nao possui;02:00:00;Acme;Rede;VPN;Ana;5;Ótimo;Suporte N1;No prazo;No prazo;A fazer;Alta;x",
        "102;Requisição de Serviço;02/01/2024;05/01/2024 10:00:00;01:00:00;Globex;Acesso;Senha;Bia;;;Suporte N2;No prazo;Atrasado;Atendendo;Média;x",
        "103;Problema;28/12/2023;nao possui;00:00:00;Acme;Servidores;Backup;Caio;3;Regular;Infra;Atrasado;Atrasado;Pausado;Alta;x",
        "104;Preventivo Técnico;10/01/2024;nao possui;00:45:00;Initech;Rede;Switch;Ana;;;Infra;No prazo;No prazo;Não possui;Baixa;x",
        "105;Melhoria;20/03/2024;21/03/2024;03:10:00;Globex;Acesso;VPN;Bia;4;Bom;Suporte N1;No prazo;No prazo;Resolvido;Baixa;x",
        "106;Incidente;05/02/2024;nao possui;00:20:00;Acme;Rede;VPN;Caio;;;Suporte N1;No prazo;No prazo;A fazer;Média;x",
        "107;Incidente;not a date;nao possui;00:20:00;Acme;Rede;VPN;Caio;;;Suporte N1;No prazo;No prazo;A fazer;Média;x",
    ];

    fn export() -> String {
        let mut csv = String::from(HDR);
        for row in ROWS {
            csv.push('\n');
            csv.push_str(row);
        }
        csv
    }

    fn dataset() -> TicketDataset {
        TicketDataset::from_csv_reader(export().as_bytes(), DashboardConfig::default())
            .expect("export must load")
    }

    /// E2E: load export → domain → filter → dashboard
    #[test]
    fn test_e2e_load_filter_aggregate() {
        let ds = dataset();

        // Load: the unparsable creation date is skipped under the default policy.
        assert_eq!(ds.report().total_rows_processed, 7);
        assert_eq!(ds.report().skipped_rows, 1);
        assert_eq!(ds.report().warnings[0].line, 8);
        assert_eq!(ds.report().ignored_columns, vec!["COLUNA IGNORADA".to_string()]);

        let ids: Vec<i64> = ds.tickets().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![103, 102, 104, 106, 101, 105]);
        assert!(ds.tickets().iter().all(|t| t.id > 0));

        // Resolution sentinel never survives as text.
        for t in ds.tickets() {
            let resolved_raw = ROWS
                .iter()
                .find(|r| r.starts_with(&t.id.to_string()))
                .and_then(|r| r.split(';').nth(3))
                .unwrap();
            if resolved_raw == "nao possui" {
                assert!(t.resolved_at.is_none(), "ticket {}", t.id);
            } else {
                assert!(t.resolved_at.is_some(), "ticket {}", t.id);
            }
        }

        // Domain
        let domain = ds.domain();
        assert_eq!(
            domain.months,
            vec!["Selecionar Tudo", "dez/2023", "jan/2024", "fev/2024", "mar/2024"]
        );
        assert_eq!(domain.clients, vec!["Selecionar Tudo", "Acme", "Globex", "Initech"]);
        assert_eq!(domain.desks, vec!["Selecionar Tudo", "Infra", "Suporte N1", "Suporte N2"]);

        // Unfiltered dashboard
        let report = ds.dashboard(&ds.select_all());
        assert_eq!(report.summary.total_tickets, 6);
        assert_eq!(report.summary.status_count("a_fazer"), Some(2));
        assert_eq!(report.summary.status_count("atendendo"), Some(1));
        assert_eq!(report.summary.status_count("pausados"), Some(1));
        assert_eq!(report.summary.status_count("em_conferencia"), Some(1));
        assert_eq!(report.summary.distinct_clients, 3);
        assert_eq!(report.by_client.get("Acme"), Some(3));
        assert_eq!(report.by_client.groups.last().unwrap().label, "Acme");
        let melhoria = report.by_type.iter().find(|s| s.ticket_type == "Melhoria").unwrap();
        assert!(melhoria.color.is_none());

        // Narrowed: jan/2024 + Infra
        let selection = ds
            .select_all()
            .with(Dimension::Month, ["jan/2024"])
            .with(Dimension::Desk, ["Infra"]);
        let report = ds.dashboard(&selection);
        assert_eq!(report.summary.total_tickets, 1);
        assert_eq!(report.summary.status_count("em_conferencia"), Some(1));
        assert_eq!(report.by_type[0].ticket_type, "Preventivo Técnico");
        assert_eq!(report.by_type[0].color.as_deref(), Some("#FFBB00"));
    }

    #[test]
    fn test_e2e_reject_load_policy_aborts() {
        let config = DashboardConfig {
            date_error_policy: DateErrorPolicy::RejectLoad,
            ..Default::default()
        };
        match TicketDataset::from_csv_reader(export().as_bytes(), config) {
            Err(AppError::InvalidCreatedAt { line, value }) => {
                assert_eq!(line, 8);
                assert_eq!(value, "not a date");
            }
            other => panic!("Expected InvalidCreatedAt, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_e2e_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Relatorio.csv");
        std::fs::write(&path, export()).unwrap();
        let ds = TicketDataset::from_csv_path(&path, DashboardConfig::default()).unwrap();
        assert_eq!(ds.tickets().len(), 6);
    }

    #[test]
    fn test_e2e_round_trip_by_month() {
        let ds = dataset();
        let mut union: Vec<&Ticket> = Vec::new();
        for month in ds.domain().months.iter().skip(1) {
            let selection = ds.select_all().with(Dimension::Month, [month.clone()]);
            union.extend(ds.filter(&selection));
        }
        // months are chronological, so concatenating per-month views keeps canonical order
        let canonical: Vec<&Ticket> = ds.tickets().iter().collect();
        assert_eq!(union, canonical);
        assert_eq!(ds.filter(&ds.select_all()), canonical);
    }

    // ─── Properties ─────────────────────────────────────────────────────────

    fn row_strategy() -> impl Strategy<Value = (u32, u32, i32, usize, usize, usize, bool)> {
        (
            1u32..=28,
            1u32..=12,
            2019i32..=2025,
            0usize..4,
            0usize..3,
            0usize..5,
            any::<bool>(),
        )
    }

    const CLIENTS: [&str; 4] = ["Acme", "Globex", "Initech", "Umbrella"];
    const DESKS: [&str; 3] = ["N1", "N2", "Infra"];
    const STATUSES: [&str; 5] = ["A fazer", "Atendendo", "Pausado", "Não possui", "Resolvido"];

    fn build_export(rows: &[(u32, u32, i32, usize, usize, usize, bool)]) -> String {
        let mut csv = String::from(HDR);
        for (i, (day, month, year, c, d, s, resolved)) in rows.iter().enumerate() {
            let resolved = if *resolved { "01/01/2026 08:00:00" } else { "nao possui" };
            csv.push_str(&format!(
                "\n{};Incidente;{:02}/{:02}/{};{};00:10:00;{};Rede;VPN;Ana;;;{};ok;ok;{};Alta;",
                i + 1,
                day,
                month,
                year,
                resolved,
                CLIENTS[*c],
                DESKS[*d],
                STATUSES[*s],
            ));
        }
        csv
    }

    proptest! {
        #[test]
        fn prop_canonical_set_sorted_unique_and_resolved_consistent(
            rows in prop::collection::vec(row_strategy(), 1..40)
        ) {
            let ds = TicketDataset::from_csv_reader(build_export(&rows).as_bytes(), DashboardConfig::default()).unwrap();
            let tickets = ds.tickets();
            prop_assert_eq!(tickets.len(), rows.len());
            prop_assert!(tickets.windows(2).all(|w| w[0].sort_key <= w[1].sort_key));
            let ids: HashSet<i64> = tickets.iter().map(|t| t.id).collect();
            prop_assert_eq!(ids.len(), tickets.len());
            for t in tickets {
                let resolved = rows[(t.id - 1) as usize].6;
                prop_assert_eq!(t.resolved_at.is_some(), resolved);
            }
        }

        #[test]
        fn prop_filter_identity_and_idempotence(
            rows in prop::collection::vec(row_strategy(), 1..40),
            client_mask in prop::collection::vec(any::<bool>(), 4),
            desk_mask in prop::collection::vec(any::<bool>(), 3),
        ) {
            let ds = TicketDataset::from_csv_reader(build_export(&rows).as_bytes(), DashboardConfig::default()).unwrap();
            let all = ds.select_all();
            prop_assert_eq!(ds.filter(&all).len(), ds.tickets().len());

            let clients: Vec<&str> = CLIENTS.iter().zip(&client_mask).filter(|(_, m)| **m).map(|(c, _)| *c).collect();
            let desks: Vec<&str> = DESKS.iter().zip(&desk_mask).filter(|(_, m)| **m).map(|(d, _)| *d).collect();
            let selection = all.with(Dimension::Client, clients.clone()).with(Dimension::Desk, desks.clone());

            let once = ds.filter(&selection);
            let twice = apply_filters(once.iter().copied(), &selection, &ds.config().select_all_label);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.iter().all(|t| clients.contains(&t.client.as_str()) && desks.contains(&t.desk.as_str())));
            if clients.is_empty() {
                prop_assert!(once.is_empty());
            }
        }

        #[test]
        fn prop_client_groups_sum_to_total(
            rows in prop::collection::vec(row_strategy(), 1..40),
        ) {
            let ds = TicketDataset::from_csv_reader(build_export(&rows).as_bytes(), DashboardConfig::default()).unwrap();
            let report = ds.dashboard(&ds.select_all());
            prop_assert_eq!(report.by_client.total(), report.summary.total_tickets);
            prop_assert_eq!(report.by_client.groups.len(), report.summary.distinct_clients);
            prop_assert!(report.by_client.groups.windows(2).all(|w| w[0].count <= w[1].count));
            let typed: u64 = report.by_type.iter().map(|s| s.count).sum();
            prop_assert_eq!(typed as usize, report.summary.total_tickets);
        }
    }
}
