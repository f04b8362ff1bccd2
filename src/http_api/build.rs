use url::Url;

use super::HttpApi;
use crate::utils::HttpBaseUrl;

pub fn build_http_url(api: &(impl HttpApi + ?Sized), base_url: &HttpBaseUrl) -> Url {
    let mut builder = base_url.build_upon();
    for segment in api.path_segments() {
        builder = builder.append_path(&segment);
    }

    for (query_name, query_value) in api.queries() {
        builder = builder.append_query(&query_name, &query_value);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AcceptFriendRequest, GroupDetailsRequest, MessagesBetween};

    fn base() -> HttpBaseUrl {
        HttpBaseUrl::new("http://localhost:8080").expect("valid base url")
    }

    #[test]
    fn builds_path_and_query() {
        let url = build_http_url(
            &MessagesBetween {
                nickname: "alice",
                friend: "bob",
            },
            &base(),
        );
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/messagesbetween?nickname=alice&friend=bob"
        );
    }

    #[test]
    fn builds_nested_path_with_id() {
        let url = build_http_url(&GroupDetailsRequest { group_id: 7 }, &base());
        assert_eq!(url.as_str(), "http://localhost:8080/groups/7/details");
    }

    #[test]
    fn escapes_query_values() {
        let url = build_http_url(
            &AcceptFriendRequest {
                sender: "bob smith",
                receiver: "alice&co",
            },
            &base(),
        );
        assert_eq!(url.path(), "/friends/accept");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("senderNickname".to_string(), "bob smith".to_string()),
                ("receiverNickname".to_string(), "alice&co".to_string()),
            ]
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let base = HttpBaseUrl::new("https://chat.example.com/api/").expect("valid base url");
        let url = build_http_url(&GroupDetailsRequest { group_id: 3 }, &base);
        assert_eq!(url.as_str(), "https://chat.example.com/api/groups/3/details");
    }
}
