use super::*;
use rstest::rstest;

#[test]
fn test_default_is_first_page_of_twenty() {
    let request = PageRequest::default();
    assert_eq!((request.page, request.per_page), (1, 20));
}

#[rstest]
#[case(1, 20, 0)]
#[case(2, 20, 20)]
#[case(5, 15, 60)]
fn test_offset(#[case] page: u32, #[case] per_page: u32, #[case] offset: u64) {
    let request = PageRequest { page, per_page };
    assert_eq!(request.offset(), offset);
    assert_eq!(request.limit(), u64::from(per_page));
}

#[rstest]
#[case(0, 500, 1, MAX_PER_PAGE)]
#[case(3, 0, 3, 1)]
#[case(2, 50, 2, 50)]
fn test_normalized_clamps(
    #[case] page: u32,
    #[case] per_page: u32,
    #[case] expected_page: u32,
    #[case] expected_per_page: u32,
) {
    let request = PageRequest { page, per_page }.normalized();
    assert_eq!(request.page, expected_page);
    assert_eq!(request.per_page, expected_per_page);
}

#[rstest]
#[case(0, 1)]
#[case(20, 1)]
#[case(21, 2)]
#[case(45, 3)]
fn test_total_pages(#[case] total: u64, #[case] pages: u64) {
    let response: PageResponse<u8> = PageResponse::new(Vec::new(), 1, 20, total);
    assert_eq!(response.meta.total_pages, pages);
    assert_eq!(response.meta.total, total);
}

#[test]
fn test_query_string_defaults() {
    let request: PageRequest = serde_json::from_str(r#"{"page": 3}"#).unwrap();
    assert_eq!((request.page, request.per_page), (3, 20));
}
