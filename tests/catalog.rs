use std::time::Duration;

use mockito::{mock, Matcher};

use nvcl_kit::{Catalog, CatalogParams, DiagnosticKind, NvclReader};

const GML: &str = "http://www.opengis.net/gml";
const GML32: &str = "http://www.opengis.net/gml/3.2";
const GSMLP: &str = "http://xmlns.geosciml.org/geosciml-portrayal/4.0";

fn timeout() -> Duration {
    Duration::from_secs(10)
}

fn view(id: &str, nvcl_collection: &str, pos: &str) -> String {
    format!(
        r#"<gsmlp:BoreholeView gml:id="BoreholeView.{id}">
            <gsmlp:identifier>http://example.org/resource/feature/borehole/{id}</gsmlp:identifier>
            <gsmlp:name>Borehole {id}</gsmlp:name>
            <gsmlp:nvclCollection>{nvcl_collection}</gsmlp:nvclCollection>
            <gsmlp:shape><gml:Point><gml:pos>{pos}</gml:pos></gml:Point></gsmlp:shape>
        </gsmlp:BoreholeView>"#,
        id = id,
        nvcl_collection = nvcl_collection,
        pos = pos,
    )
}

fn collection_1_1(views: &[String]) -> String {
    let members: String = views
        .iter()
        .map(|view| format!("<gml:featureMember>{}</gml:featureMember>", view))
        .collect();

    format!(
        r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs" xmlns:gml="{}" xmlns:gsmlp="{}">{}</wfs:FeatureCollection>"#,
        GML, GSMLP, members
    )
}

fn collection_2_0(views: &[String]) -> String {
    let members: String = views
        .iter()
        .map(|view| format!("<wfs:member>{}</wfs:member>", view))
        .collect();

    format!(
        r#"<wfs:FeatureCollection xmlns:wfs="http://www.opengis.net/wfs/2.0" xmlns:gml="{}" xmlns:gsmlp="{}" numberReturned="{}">{}</wfs:FeatureCollection>"#,
        GML32,
        GSMLP,
        views.len(),
        members
    )
}

#[test]
fn server_side_filtering() {
    let _wfs = mock("GET", "/filtered/wfs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("service".into(), "WFS".into()),
            Matcher::UrlEncoded("version".into(), "1.1.0".into()),
            Matcher::UrlEncoded("request".into(), "GetFeature".into()),
            Matcher::UrlEncoded("typeName".into(), "gsmlp:BoreholeView".into()),
            Matcher::UrlEncoded("srsName".into(), "EPSG:4326".into()),
            Matcher::Regex("filter=".into()),
        ]))
        .with_body(collection_1_1(&[
            view("1", "true", "145.0 -41.0"),
            view("2", "false", "146.0 -42.0"),
            view("3", "TRUE", "10.0 50.0"),
            view("4", "True", "147.0 -43.0"),
        ]))
        .create();

    let catalog = Catalog::connect(
        &CatalogParams {
            wfs_url: Some(format!("{}/filtered/wfs", mockito::server_url())),
            nvcl_url: Some("http://localhost/nvcl".into()),
            ..Default::default()
        },
        timeout(),
    );

    assert!(catalog.is_ready());
    assert!(catalog.diagnostics().is_empty());
    assert_eq!(catalog.nvcl_ids(), vec!["1", "4"]);

    let first = &catalog.boreholes()[0];
    assert_eq!((first.x, first.y, first.z), (145.0, -41.0, 0.0));
}

#[test]
fn local_filtering_keeps_pages_before_a_fault() {
    let _first_page = mock("GET", "/paged/wfs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("version".into(), "2.0.0".into()),
            Matcher::UrlEncoded("typeNames".into(), "gsmlp:BoreholeView".into()),
            Matcher::UrlEncoded("count".into(), "10000".into()),
            Matcher::UrlEncoded("startIndex".into(), "0".into()),
        ]))
        .with_body(collection_2_0(&[
            view("10", "true", "-41.0 145.0"),
            view("11", "true", "-42.0 146.0"),
        ]))
        .create();
    let _second_page = mock("GET", "/paged/wfs")
        .match_query(Matcher::UrlEncoded("startIndex".into(), "10000".into()))
        .with_status(500)
        .create();

    let catalog = Catalog::connect(
        &CatalogParams {
            wfs_url: Some(format!("{}/paged/wfs", mockito::server_url())),
            nvcl_url: Some("http://localhost/nvcl".into()),
            wfs_version: Some("2.0.0".into()),
            borehole_crs: Some("EPSG:4283".into()),
            use_local_filtering: Some(true),
            ..Default::default()
        },
        timeout(),
    );

    assert!(catalog.is_ready());
    assert_eq!(catalog.nvcl_ids(), vec!["10", "11"]);
    assert_eq!(
        catalog.diagnostics().kinds(),
        vec![DiagnosticKind::TransportFault]
    );

    // lat/lon axis order for anything other than EPSG:4326
    let first = &catalog.boreholes()[0];
    assert_eq!((first.x, first.y), (145.0, -41.0));
}

#[test]
fn local_filtering_needs_wfs_2() {
    let catalog = Catalog::connect(
        &CatalogParams {
            wfs_url: Some("http://localhost:1/wfs".into()),
            nvcl_url: Some("http://localhost:1/nvcl".into()),
            use_local_filtering: Some(true),
            ..Default::default()
        },
        timeout(),
    );

    assert!(!catalog.is_ready());
    assert!(catalog.boreholes().is_empty());
    assert_eq!(
        catalog.diagnostics().kinds(),
        vec![DiagnosticKind::ModeConflictError]
    );
}

#[test]
fn reader_lists_datasets() {
    let _wfs = mock("GET", "/reader/wfs")
        .match_query(Matcher::Any)
        .with_body(collection_1_1(&[view("12991", "true", "145.0 -41.0")]))
        .create();
    let _datasets = mock("GET", "/reader/nvcl/getDatasetCollection.html")
        .match_query(Matcher::UrlEncoded("holeidentifier".into(), "12991".into()))
        .with_body(
            "<DatasetCollection>\
                <Dataset><DatasetID>ds-1</DatasetID><DatasetName>12991_1</DatasetName></Dataset>\
                <Dataset><DatasetID>ds-2</DatasetID><DatasetName>12991_2</DatasetName></Dataset>\
            </DatasetCollection>",
        )
        .create();

    let reader = NvclReader::new(
        &CatalogParams {
            wfs_url: Some(format!("{}/reader/wfs", mockito::server_url())),
            nvcl_url: Some(format!("{}/reader/nvcl/", mockito::server_url())),
            ..Default::default()
        },
        timeout(),
    );

    assert!(reader.is_ready());
    assert_eq!(
        reader.get_datasetid_list("12991").unwrap(),
        vec!["ds-1", "ds-2"]
    );
}
