//! Server-rendered HTML for the storefront pages.
//!
//! Every interpolated value goes through [`escape`]; numbers and statuses are
//! rendered from typed values.

use std::fmt::Write;

use crate::{
    dto::{admin::AdminDashboard, cart::CartView, orders::OrderWithItems},
    middleware::auth::AuthUser,
    models::{Order, OrderStatus, Product},
    money::format_price,
    response::Paged,
    routes::params::ProductQuery,
};

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn nav(user: Option<&AuthUser>) -> String {
    let mut links = String::from(r#"<a href="/">Shop</a>"#);
    match user {
        Some(user) => {
            links.push_str(r#" | <a href="/cart">Cart</a> | <a href="/orders">My orders</a>"#);
            if user.is_admin {
                links.push_str(r#" | <a href="/admin">Admin</a>"#);
            }
            let _ = write!(
                links,
                r#" | Signed in as <strong>{}</strong> <form class="inline" method="post" action="/logout"><button>Log out</button></form>"#,
                escape(&user.username)
            );
        }
        None => links.push_str(r#" | <a href="/login">Log in</a> | <a href="/register">Register</a>"#),
    }
    format!("<nav>{links}</nav>")
}

pub fn layout(title: &str, user: Option<&AuthUser>, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} · Storefront</title>
<style>
body {{ font-family: sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border-bottom: 1px solid #ddd; padding: .4rem; text-align: left; }}
.products {{ display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 1rem; }}
.product img {{ max-width: 100%; height: 120px; object-fit: contain; }}
form.inline {{ display: inline; }}
.error {{ color: #b00; }}
</style>
</head>
<body>
{nav}
<h1>{title}</h1>
{body}
</body>
</html>"#,
        title = escape(title),
        nav = nav(user),
    )
}

/// Plain message page used for user-facing errors.
pub fn message(text: &str) -> String {
    layout(
        "Notice",
        None,
        &format!(r#"<p class="error">{}</p><p><a href="/">Back to the shop</a></p>"#, escape(text)),
    )
}

fn product_image(product: &Product) -> String {
    match &product.image {
        Some(image) => format!(
            r#"<img src="/static/images/{}" alt="{}">"#,
            escape(image),
            escape(&product.name)
        ),
        None => String::new(),
    }
}

fn line_total(total: Option<i64>) -> String {
    total.map(format_price).unwrap_or_else(|| "-".to_string())
}

fn pager(meta: &crate::response::Meta, href: impl Fn(i64) -> String) -> String {
    let page = meta.page.unwrap_or(1);
    let mut out = String::new();
    if page > 1 {
        let _ = write!(out, r#"<a href="{}">&laquo; Previous</a> "#, escape(&href(page - 1)));
    }
    if meta.has_next() {
        let _ = write!(
            out,
            r#"<a href="{}">Next &raquo;</a>"#,
            escape(&href(page.saturating_add(1)))
        );
    }
    if out.is_empty() {
        out
    } else {
        format!("<p>{out}</p>")
    }
}

pub fn home(user: Option<&AuthUser>, products: &Paged<Product>, query: &ProductQuery) -> String {
    let search = query.search().unwrap_or("");
    let mut body = format!(
        r#"<form method="get" action="/"><input name="q" value="{}" placeholder="Search parts"> <button>Search</button></form>"#,
        escape(search)
    );

    if products.items.is_empty() {
        body.push_str("<p>No products found.</p>");
    } else {
        body.push_str(r#"<div class="products">"#);
        for product in &products.items {
            let action = match user {
                Some(_) => format!(
                    r#"<form method="post" action="/cart/add/{}"><button>Add to cart</button></form>"#,
                    product.id
                ),
                None => r#"<a href="/login">Log in to buy</a>"#.to_string(),
            };
            let _ = write!(
                body,
                r#"<div class="product">{}<h3>{}</h3><p>{}</p>{}</div>"#,
                product_image(product),
                escape(&product.name),
                format_price(product.price),
                action
            );
        }
        body.push_str("</div>");
    }

    body.push_str(&pager(&products.meta, |page| {
        format!("/?{}", query.to_page_query(page))
    }));
    layout("Products", user, &body)
}

pub fn register_form(user: Option<&AuthUser>) -> String {
    let body = r#"<form method="post" action="/register">
<p><label>Username <input name="username" required></label></p>
<p><label>Email <input name="email" type="email" required></label></p>
<p><label>Password <input name="password" type="password" required></label></p>
<p><button>Register</button></p>
</form>
<p>Already registered? <a href="/login">Log in</a></p>"#;
    layout("Register", user, body)
}

pub fn login_form(user: Option<&AuthUser>) -> String {
    let body = r#"<form method="post" action="/login">
<p><label>Email <input name="email" type="email" required></label></p>
<p><label>Password <input name="password" type="password" required></label></p>
<p><button>Log in</button></p>
</form>
<p>New here? <a href="/register">Create an account</a></p>"#;
    layout("Log in", user, body)
}

fn cart_table(view: &CartView, removable: bool) -> String {
    let mut rows = String::new();
    for line in &view.lines {
        let remove = if removable {
            format!(
                r#"<td><form method="post" action="/cart/remove/{}"><button>Remove</button></form></td>"#,
                line.id
            )
        } else {
            String::new()
        };
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>{}</tr>",
            escape(&line.name),
            format_price(line.price),
            line.quantity,
            line_total(line.line_total()),
            remove
        );
    }
    format!(
        "<table><tr><th>Product</th><th>Price</th><th>Qty</th><th>Subtotal</th></tr>{rows}</table><p><strong>Total: {}</strong></p>",
        format_price(view.total)
    )
}

pub fn cart(user: &AuthUser, view: &CartView) -> String {
    let body = if view.is_empty() {
        r#"<p>Your cart is empty. <a href="/">Keep shopping</a></p>"#.to_string()
    } else {
        format!(
            r#"{}<p><a href="/checkout">Proceed to checkout</a></p>"#,
            cart_table(view, true)
        )
    };
    layout("Your cart", Some(user), &body)
}

pub fn checkout(user: &AuthUser, view: &CartView) -> String {
    let body = if view.is_empty() {
        r#"<p>Nothing to check out. <a href="/">Keep shopping</a></p>"#.to_string()
    } else {
        format!(
            r#"{}<p><a href="/payment">Continue to payment</a></p>"#,
            cart_table(view, false)
        )
    };
    layout("Checkout", Some(user), &body)
}

pub fn payment(user: &AuthUser, total: i64) -> String {
    let body = format!(
        r#"<p>Amount due: <strong>{}</strong></p>
<form method="post" action="/payment">
<p><label>Card number <input name="card_number" autocomplete="off"></label></p>
<p><button>Pay now</button></p>
</form>
<p><small>Payments are simulated; no card is charged.</small></p>"#,
        format_price(total)
    );
    layout("Payment", Some(user), &body)
}

fn order_rows(orders: &[Order], link_prefix: &str) -> String {
    let mut rows = String::new();
    for order in orders {
        let _ = write!(
            rows,
            r#"<tr><td><a href="{link_prefix}{id}">{id}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
            order.created_at.format("%Y-%m-%d %H:%M"),
            format_price(order.total),
            order.status,
            id = order.id,
        );
    }
    rows
}

pub fn orders(user: &AuthUser, orders: &Paged<Order>) -> String {
    let body = if orders.items.is_empty() {
        r#"<p>You have no orders yet.</p>"#.to_string()
    } else {
        format!(
            "<table><tr><th>Order</th><th>Placed</th><th>Total</th><th>Status</th></tr>{}</table>{}",
            order_rows(&orders.items, "/orders/"),
            pager(&orders.meta, |page| format!("/orders?page={page}"))
        )
    };
    layout("My orders", Some(user), &body)
}

pub fn order_detail(user: &AuthUser, detail: &OrderWithItems) -> String {
    let mut rows = String::new();
    for item in &detail.items {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&item.product_name),
            format_price(item.price),
            item.quantity,
            line_total(item.line_total())
        );
    }
    let order = &detail.order;
    let body = format!(
        r#"<p>Placed {} · Status: <strong>{}</strong></p>
<table><tr><th>Product</th><th>Price</th><th>Qty</th><th>Subtotal</th></tr>{rows}</table>
<p><strong>Total: {}</strong></p><p><a href="/orders">Back to orders</a></p>"#,
        order.created_at.format("%Y-%m-%d %H:%M"),
        order.status,
        format_price(order.total)
    );
    layout(&format!("Order {}", order.id), Some(user), &body)
}

fn status_select(current: OrderStatus) -> String {
    let mut options = String::new();
    for status in OrderStatus::ALL {
        let selected = if status == current { " selected" } else { "" };
        let _ = write!(options, r#"<option value="{status}"{selected}>{status}</option>"#);
    }
    format!(r#"<select name="status">{options}</select>"#)
}

pub fn admin(user: &AuthUser, dashboard: &AdminDashboard) -> String {
    let mut body = String::from(
        "<h2>Products</h2><table><tr><th>Name</th><th>Price</th><th>Image</th><th></th></tr>",
    );
    for product in &dashboard.products {
        let _ = write!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td><a href="/admin/products/{id}/edit">Edit</a> <form class="inline" method="post" action="/admin/products/{id}/delete"><button>Delete</button></form></td></tr>"#,
            escape(&product.name),
            format_price(product.price),
            escape(product.image.as_deref().unwrap_or("")),
            id = product.id,
        );
    }
    body.push_str("</table>");

    body.push_str(
        "<h2>Orders</h2><table><tr><th>Order</th><th>User</th><th>Total</th><th>Placed</th><th>Status</th></tr>",
    );
    for order in &dashboard.orders {
        let _ = write!(
            body,
            r#"<tr><td>{id}</td><td>{}</td><td>{}</td><td>{}</td><td><form method="post" action="/admin/orders/{id}/status">{} <button>Update</button></form></td></tr>"#,
            order.user_id,
            format_price(order.total),
            order.created_at.format("%Y-%m-%d %H:%M"),
            status_select(order.status),
            id = order.id,
        );
    }
    body.push_str("</table>");
    layout("Admin", Some(user), &body)
}

pub fn edit_product(user: &AuthUser, product: &Product) -> String {
    let body = format!(
        r#"<form method="post" action="/admin/products/{id}/edit">
<p><label>Name <input name="name" value="{}" required></label></p>
<p><label>Price <input name="price" value="{}" required></label></p>
<p><label>Image <input name="image" value="{}"></label></p>
<p><button>Save</button> <a href="/admin">Cancel</a></p>
</form>"#,
        escape(&product.name),
        format_price(product.price),
        escape(product.image.as_deref().unwrap_or("")),
        id = product.id,
    );
    layout("Edit product", Some(user), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{response::Meta, routes::params::ProductSortBy};
    use uuid::Uuid;

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn pager_links_keep_listing_filters() {
        let query = ProductQuery {
            min_price: Some(500),
            sort_by: Some(ProductSortBy::Name),
            ..Default::default()
        };
        let html = pager(&Meta::new(2, 20, 100), |page| {
            format!("/?{}", query.to_page_query(page))
        });
        assert!(html.contains(r#"href="/?page=1&amp;min_price=500&amp;sort_by=name""#));
        assert!(html.contains(r#"href="/?page=3&amp;min_price=500&amp;sort_by=name""#));
    }

    #[test]
    fn pager_at_last_page_has_no_next_link() {
        let html = pager(&Meta::new(i64::MAX, 20, 10), |page| format!("/orders?page={page}"));
        assert!(!html.contains("Next"));
        assert!(html.contains("Previous"));
    }

    #[test]
    fn nav_shows_admin_link_only_for_admins() {
        let mut user = AuthUser {
            user_id: Uuid::new_v4(),
            username: "<b>ravi</b>".into(),
            is_admin: false,
        };
        let page = layout("Shop", Some(&user), "");
        assert!(!page.contains(r#"href="/admin""#));
        assert!(page.contains("&lt;b&gt;ravi&lt;/b&gt;"));

        user.is_admin = true;
        assert!(layout("Shop", Some(&user), "").contains(r#"href="/admin""#));
    }

    #[test]
    fn status_select_marks_current_status() {
        let html = status_select(OrderStatus::Shipped);
        assert!(html.contains(r#"<option value="Shipped" selected>"#));
        assert!(html.contains(r#"<option value="Paid">"#));
    }
}
