//! Server-Rendered Pages
//!
//! Small HTML rendering helpers for the two demo pages. Values sourced
//! from remote services are escaped before interpolation; the linking
//! token and customer id travel as data attributes so the inline widget
//! script stays free of interpolated text.

use crate::checkout::{CheckoutOffer, CheckoutOutcome};

/// Escape a value for interpolation into HTML text or attributes
fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Shared page chrome
fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
           <meta charset=\"utf-8\">\n\
           <title>Bank Checkout Demo</title>\n\
           <link rel=\"stylesheet\" href=\"/static/widget.css\">\n\
           <script src=\"https://cdn.sandbox.banklink.example/v1/banklink.js\"></script>\n\
         </head>\n\
         <body>\n\
         {body}\n\
         </body>\n\
         </html>\n"
    )
}

/// Landing page embedding the linking token and customer id for the
/// client-side bank-linking widget
pub fn landing(token: &str, customer_id: &str, offer: &CheckoutOffer) -> String {
    let token = escape(token);
    let customer_id = escape(customer_id);
    let blurb = escape(&format!(
        "{} car, 30 days trial for only ${:.2}!",
        offer.product_name, offer.trial_price
    ));

    let body = format!(
        "<article>\n\
           <label class=\"amount\"><span>{blurb}</span></label>\n\
         </article>\n\
         <div id=\"mainContainer\" data-linking-token=\"{token}\" data-customer-id=\"{customer_id}\">\n\
           <input type=\"button\" id=\"start\" value=\"Add Bank\">\n\
         </div>\n\
         <div id=\"widgetContainer\"></div>\n\
         <form action=\"/charge\" method=\"post\" id=\"checkout-form\">\n\
           <input type=\"hidden\" name=\"fundingSource\" value=\"\">\n\
           <input type=\"hidden\" name=\"customerId\" value=\"{customer_id}\">\n\
         </form>\n\
         <script type=\"text/javascript\">\n\
           document.getElementById('start').addEventListener('click', function () {{\n\
             var container = document.getElementById('mainContainer');\n\
             banklink.configure('sandbox');\n\
             banklink.start(container.dataset.linkingToken, {{\n\
               container: 'widgetContainer',\n\
               stylesheets: ['/static/widget.css'],\n\
               microDeposits: true,\n\
               fallbackToMicroDeposits: true\n\
             }}, function (err, res) {{\n\
               if (err) {{\n\
                 console.log('Error: ' + JSON.stringify(err) + ' -- Response: ' + JSON.stringify(res));\n\
                 return;\n\
               }}\n\
               var form = document.getElementById('checkout-form');\n\
               form.elements['fundingSource'].value = res._links['funding-source'].href;\n\
               form.submit();\n\
             }});\n\
           }});\n\
         </script>"
    );

    layout(&body)
}

/// Invoice summary page rendered after checkout
pub fn invoice(outcome: &CheckoutOutcome) -> String {
    let body = match &outcome.invoice {
        Some(invoice) => {
            let mut items = String::new();
            for item in &invoice.items {
                let subscription = item.subscription_id.as_deref().unwrap_or("-");
                let start = item
                    .start_date
                    .map_or_else(|| "-".to_string(), |d| d.to_string());
                items.push_str(&format!(
                    "  <li>subscription_id={}, amount={}, start_date={}</li>\n",
                    escape(subscription),
                    item.amount,
                    escape(&start),
                ));
            }

            format!("<h2>Thanks! Here is your invoice:</h2>\n<ul>\n{items}</ul>")
        }
        None => "<h2>Thanks! Your invoice is not ready yet.</h2>\n\
                 <p>The subscription is still being processed; check back shortly.</p>"
            .to_string(),
    };

    layout(&body)
}
