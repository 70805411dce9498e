//! Location resolution tests

use crate::{
    CatalogConfig, ColumnDescriptor, Error, PartitionDescriptor, TableDescriptor, TableLocator,
    mock::MockCatalog,
};

fn locator(catalog: &MockCatalog) -> TableLocator<MockCatalog> {
    TableLocator::new(catalog.clone(), CatalogConfig::new("thrift://metastore:9083"))
}

/// A non-partitioned `analytics.orders` table at `/data/orders`.
fn orders_descriptor() -> TableDescriptor {
    TableDescriptor {
        database: "analytics".to_owned(),
        name: "orders".to_owned(),
        columns: vec![
            ColumnDescriptor::new("id", "bigint"),
            ColumnDescriptor::new("amount", "double"),
        ],
        partition_keys: Vec::new(),
        location: "/data/orders".parse().expect("Failed to parse location"),
    }
}

/// An `analytics.sales` table partitioned by `ds`, with partitions for
/// `2023-01-01` and `2023-01-02`.
fn sales_catalog() -> MockCatalog {
    let catalog = MockCatalog::new();
    catalog.insert_table(TableDescriptor {
        database: "analytics".to_owned(),
        name: "sales".to_owned(),
        columns: vec![
            ColumnDescriptor::new("id", "bigint"),
            ColumnDescriptor::new("amount", "double"),
        ],
        partition_keys: vec![ColumnDescriptor::new("ds", "string")],
        location: "/data/sales".parse().expect("Failed to parse location"),
    });
    catalog.insert_partition(
        "analytics",
        "sales",
        PartitionDescriptor {
            values: vec!["2023-01-01".to_owned()],
            location: "/data/sales/2023-01-01"
                .parse()
                .expect("Failed to parse partition location"),
        },
    );
    catalog.insert_partition(
        "analytics",
        "sales",
        PartitionDescriptor {
            values: vec!["2023-01-02".to_owned()],
            location: "/data/sales/2023-01-02"
                .parse()
                .expect("Failed to parse partition location"),
        },
    );
    catalog
}

#[tokio::test]
async fn blank_filter_resolves_to_table_level_location() {
    //* Given
    let catalog = MockCatalog::new();
    catalog.insert_table(orders_descriptor());

    //* When
    let for_none = locator(&catalog)
        .storage_locations(Some("analytics"), "orders", None)
        .await
        .expect("Failed to resolve locations");
    let for_blank = locator(&catalog)
        .storage_locations(Some("analytics"), "orders", Some("   "))
        .await
        .expect("Failed to resolve locations");

    //* Then
    assert_eq!(for_none, ["/data/orders"]);
    assert_eq!(for_blank, ["/data/orders"]);
}

#[tokio::test]
async fn filter_on_non_partitioned_table_resolves_to_empty() {
    //* Given
    let catalog = MockCatalog::new();
    catalog.insert_table(orders_descriptor());

    //* When
    let locations = locator(&catalog)
        .storage_locations(Some("analytics"), "orders", Some("ds='2023-01-01'"))
        .await
        .expect("Failed to resolve locations");

    //* Then
    assert!(locations.is_empty());
}

#[tokio::test]
async fn range_filter_resolves_to_all_matching_partitions() {
    //* Given
    let catalog = sales_catalog();

    //* When
    let locations = locator(&catalog)
        .storage_locations(Some("analytics"), "sales", Some("ds>='2023-01-01'"))
        .await
        .expect("Failed to resolve locations");

    //* Then
    assert_eq!(
        locations,
        ["/data/sales/2023-01-01", "/data/sales/2023-01-02"]
    );
}

#[tokio::test]
async fn equality_filter_resolves_to_the_matching_subset() {
    //* Given
    let catalog = sales_catalog();

    //* When
    let locations = locator(&catalog)
        .storage_locations(Some("analytics"), "sales", Some("ds='2023-01-02'"))
        .await
        .expect("Failed to resolve locations");

    //* Then
    assert_eq!(locations, ["/data/sales/2023-01-02"]);
}

#[tokio::test]
async fn partition_locations_keep_catalog_order() {
    //* Given - partitions registered newest-first
    let catalog = MockCatalog::new();
    catalog.insert_table(TableDescriptor {
        database: "analytics".to_owned(),
        name: "events".to_owned(),
        columns: vec![ColumnDescriptor::new("id", "bigint")],
        partition_keys: vec![ColumnDescriptor::new("ds", "string")],
        location: "/data/events".parse().expect("Failed to parse location"),
    });
    for ds in ["2023-03-03", "2023-01-01", "2023-02-02"] {
        catalog.insert_partition(
            "analytics",
            "events",
            PartitionDescriptor {
                values: vec![ds.to_owned()],
                location: format!("/data/events/{ds}")
                    .parse()
                    .expect("Failed to parse partition location"),
            },
        );
    }

    //* When
    let locations = locator(&catalog)
        .storage_locations(Some("analytics"), "events", Some("ds>='2023-01-01'"))
        .await
        .expect("Failed to resolve locations");

    //* Then - catalog-returned order, no re-sorting
    assert_eq!(
        locations,
        [
            "/data/events/2023-03-03",
            "/data/events/2023-01-01",
            "/data/events/2023-02-02",
        ]
    );
}

#[tokio::test]
async fn filter_matching_no_partition_resolves_to_empty() {
    //* Given
    let catalog = sales_catalog();

    //* When
    let locations = locator(&catalog)
        .storage_locations(Some("analytics"), "sales", Some("ds='2099-01-01'"))
        .await
        .expect("Failed to resolve locations");

    //* Then - soft condition, not an error
    assert!(locations.is_empty());
}

#[tokio::test]
async fn blank_table_name_fails_before_any_catalog_call() {
    //* Given
    let catalog = sales_catalog();

    //* When
    let err = locator(&catalog)
        .storage_locations(Some("analytics"), "  ", None)
        .await
        .unwrap_err();

    //* Then
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(catalog.open_count(), 0);
}

#[tokio::test]
async fn missing_table_fails_with_no_such_table() {
    //* Given
    let catalog = MockCatalog::new();

    //* When
    let err = locator(&catalog)
        .storage_locations(Some("analytics"), "ghost", None)
        .await
        .unwrap_err();

    //* Then
    assert!(matches!(
        err,
        Error::NoSuchTable { ref db, ref table } if db == "analytics" && table == "ghost"
    ));
}

#[tokio::test]
async fn absent_database_defaults_to_configured_name() {
    //* Given - a table registered under the conventional default database
    let catalog = MockCatalog::new();
    catalog.insert_table(TableDescriptor {
        database: "default".to_owned(),
        name: "orders".to_owned(),
        columns: vec![ColumnDescriptor::new("id", "bigint")],
        partition_keys: Vec::new(),
        location: "/data/orders".parse().expect("Failed to parse location"),
    });

    //* When
    let for_none = locator(&catalog)
        .storage_locations(None, "orders", None)
        .await
        .expect("Failed to resolve locations");
    let for_blank = locator(&catalog)
        .storage_locations(Some(""), "orders", None)
        .await
        .expect("Failed to resolve locations");

    //* Then
    assert_eq!(for_none, ["/data/orders"]);
    assert_eq!(for_blank, ["/data/orders"]);
}

#[tokio::test]
async fn table_fetch_returns_the_catalog_descriptor() {
    //* Given
    let catalog = sales_catalog();

    //* When
    let descriptor = locator(&catalog)
        .table(Some("analytics"), "sales")
        .await
        .expect("Failed to fetch table");

    //* Then
    assert_eq!(descriptor.name, "sales");
    assert_eq!(descriptor.location, "/data/sales");
    assert!(descriptor.is_partitioned());
    assert_eq!(catalog.open_count(), 1);
    assert_eq!(catalog.close_count(), 1);
}

#[tokio::test]
async fn session_is_closed_exactly_once_per_open() {
    //* Given
    let catalog = sales_catalog();
    let locator = locator(&catalog);

    //* When - one successful and one failing resolution
    locator
        .storage_locations(Some("analytics"), "sales", None)
        .await
        .expect("Failed to resolve locations");
    locator
        .storage_locations(Some("analytics"), "ghost", None)
        .await
        .unwrap_err();

    //* Then - every opened session was released
    assert_eq!(catalog.open_count(), 2);
    assert_eq!(catalog.close_count(), 2);
}

#[tokio::test]
async fn close_failure_does_not_mask_the_resolution_result() {
    //* Given
    let catalog = MockCatalog::new();
    catalog.insert_table(orders_descriptor());
    catalog.fail_close();

    //* When
    let locations = locator(&catalog)
        .storage_locations(Some("analytics"), "orders", None)
        .await
        .expect("Failed to resolve locations");

    //* Then
    assert_eq!(locations, ["/data/orders"]);
    assert_eq!(catalog.close_count(), 1);
}

#[tokio::test]
async fn connection_failure_surfaces_as_connection_error() {
    //* Given
    let catalog = sales_catalog();
    catalog.fail_next_open();

    //* When
    let err = locator(&catalog)
        .storage_locations(Some("analytics"), "sales", None)
        .await
        .unwrap_err();

    //* Then
    assert!(matches!(err, Error::Connection(_)));
    assert!(err.is_connection_error());
    assert_eq!(catalog.open_count(), 0);
}
