use proptest::prelude::*;

use secretaria_client::{
    map_transport_error, ClientError, Pagination, TransportError, COURSE_MESSAGES,
    TEACHER_MESSAGES,
};

fn mixed_case(phrase: &str, mask: &[bool]) -> String {
    phrase
        .chars()
        .zip(mask.iter().cycle())
        .map(|(c, upper)| if *upper { c.to_uppercase().collect::<String>() } else { c.to_string() })
        .collect()
}

proptest! {
    #[test]
    fn prop_duplicate_phrase_matches_in_any_case(
        subject in prop::sample::select(vec!["Professor", "CPF", "Email", "Registro"]),
        prefix in "[a-zA-Z :]{0,20}",
        suffix in "[a-zA-Z .]{0,20}",
        mask in proptest::collection::vec(any::<bool>(), 1..8),
    ) {
        let body = format!("{}{} {}{}", prefix, subject, mixed_case("já cadastrado", &mask), suffix);
        let err = map_transport_error(TransportError::Status { status: 400, body }, &TEACHER_MESSAGES);
        prop_assert_eq!(err.user_message(), "Este professor já está cadastrado no sistema.");
    }

    #[test]
    fn prop_not_found_ignores_body(body in ".{0,40}") {
        let err = map_transport_error(TransportError::Status { status: 404, body }, &COURSE_MESSAGES);
        let is_not_found = matches!(err, ClientError::NotFound { .. });
        prop_assert!(is_not_found);
        prop_assert_eq!(err.user_message(), "Nenhum curso encontrado.");
    }

    #[test]
    fn prop_other_statuses_keep_status(status in 405u16..600, text in "[a-z]{1,20}") {
        let err = map_transport_error(
            TransportError::Status { status, body: text.clone() },
            &TEACHER_MESSAGES,
        );
        prop_assert_eq!(err.status(), Some(status));
        prop_assert_eq!(err.user_message(), text);
    }

    #[test]
    fn prop_pages_tile_the_list(len in 0usize..200, size in 1usize..30) {
        let items: Vec<usize> = (0..len).collect();
        let mut pages = Pagination::new(1, size);
        let mut seen = Vec::new();
        loop {
            let page = pages.page_of(&items);
            if page.is_empty() {
                break;
            }
            prop_assert_eq!(page[0], pages.offset());
            seen.extend_from_slice(page);
            pages.next();
        }
        prop_assert_eq!(seen, items);
    }
}
