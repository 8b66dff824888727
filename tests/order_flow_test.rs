use anyhow::Result;
use mercuriale::core::{Dataset, Record, SourceTag};
use mercuriale::{search, Catalog, CsvExporter, LocalStorage, OrderList, OrderSession};
use serde_json::json;
use tempfile::TempDir;

fn dataset(source: SourceTag, values: Vec<serde_json::Value>) -> Dataset {
    let records: Vec<Record> = values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect();
    Dataset::new(source, records)
}

fn catalog() -> Catalog {
    Catalog::new(
        dataset(
            SourceTag::Folkestone,
            vec![json!({"Code Produit": "A1", "Libellé produit": "Pain"})],
        ),
        dataset(
            SourceTag::Vendome,
            vec![
                json!({"Code Produit": 77, "Libellé produit": "Sucre \"extra\"; fin", "Conditionnement": "1 kg"}),
                json!({"Code Produit": "A1", "Libellé produit": "Amandes"}),
            ],
        ),
        dataset(
            SourceTag::Washington,
            vec![json!({"Code Produit": "W-3", "Libellé produit": "Sel", "Origine": null})],
        ),
    )
}

#[test]
fn test_documented_end_to_end_example() -> Result<()> {
    let folkestone = dataset(
        SourceTag::Folkestone,
        vec![json!({"Code Produit": "A1", "Libellé produit": "Pain"})],
    );

    let found = search("a1", &folkestone);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0], &folkestone.records()[0]);

    let mut order = OrderList::new();
    order.add("A1", SourceTag::Folkestone, &folkestone)?;
    assert_eq!(
        serde_json::Value::Object(order.entries()[0].to_merged()),
        json!({"Code Produit": "A1", "Libellé produit": "Pain", "source": "folkestone"})
    );

    let bytes = CsvExporter::new().export_bytes(&order)?;
    let mut expected = vec![0xEF, 0xBB, 0xBF];
    expected.extend_from_slice("Source;Code Produit;Libellé produit\nfolkestone;A1;Pain".as_bytes());
    assert_eq!(bytes, expected);
    Ok(())
}

#[tokio::test]
async fn test_session_across_sources_exports_to_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output_path = temp_dir.path().join("output");
    let storage = LocalStorage::new(output_path.to_str().unwrap().to_string());

    let mut session = OrderSession::new(catalog());
    session.add("A1")?;

    session.set_source(SourceTag::Vendome);
    let hits = session.search("SUCRE");
    assert_eq!(hits.len(), 1);
    let code = hits[0].code();
    session.add(&code)?;
    session.add("A1")?;

    session.set_source(SourceTag::Washington);
    session.add("W-3")?;

    let written = session.export_to(&storage, "ma_commande.csv").await?;
    assert!(written.ends_with("ma_commande.csv"));

    let content = tokio::fs::read_to_string(output_path.join("ma_commande.csv")).await?;
    let body = content.strip_prefix('\u{FEFF}').expect("BOM prefix");
    let lines: Vec<&str> = body.split('\n').collect();

    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "Source;Code Produit;Libellé produit;Conditionnement;Origine"
    );
    assert_eq!(lines[1], "folkestone;A1;Pain;;");
    assert_eq!(lines[2], "vendome;77;\"Sucre \"\"extra\"\"; fin\";1 kg;");
    assert_eq!(lines[3], "vendome;A1;Amandes;;");
    assert_eq!(lines[4], "washington;W-3;Sel;;");
    Ok(())
}

#[test]
fn test_duplicate_add_leaves_order_untouched() -> Result<()> {
    let mut session = OrderSession::new(catalog());
    session.add("A1")?;
    let before = session.order().clone();

    let err = session.add("A1").unwrap_err();

    assert_eq!(
        err.to_string(),
        "Cet article de la mercuriale \"folkestone\" est déjà dans la liste de commande."
    );
    assert_eq!(session.order(), &before);
    Ok(())
}

#[test]
fn test_remove_keeps_remaining_order() -> Result<()> {
    let mut session = OrderSession::with_source(catalog(), SourceTag::Vendome);
    session.add("77")?;
    session.add("A1")?;
    session.set_source(SourceTag::Folkestone);
    session.add("A1")?;

    session.remove("A1", SourceTag::Vendome);

    let remaining: Vec<(String, SourceTag)> = session
        .order()
        .entries()
        .iter()
        .map(|e| (e.code(), e.source()))
        .collect();
    assert_eq!(
        remaining,
        vec![
            ("77".to_string(), SourceTag::Vendome),
            ("A1".to_string(), SourceTag::Folkestone)
        ]
    );
    Ok(())
}

#[test]
fn test_export_refused_until_something_is_added() {
    let temp_dir = TempDir::new().unwrap();
    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let mut session = OrderSession::new(catalog());

    tokio_test::block_on(async {
        assert!(session.export_to(&storage, "ma_commande.csv").await.is_err());
        assert!(!temp_dir.path().join("ma_commande.csv").exists());

        session.add("A1").unwrap();
        session.export_to(&storage, "ma_commande.csv").await.unwrap();
        assert!(temp_dir.path().join("ma_commande.csv").exists());
    });
}
