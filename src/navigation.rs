//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::endpoints;

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-green-700 rounded-sm lg:bg-transparent
        lg:text-green-700 lg:p-0 dark:text-white lg:dark:text-green-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-green-700 lg:p-0
        dark:text-white lg:dark:hover:text-green-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

/// The app-wide navigation bar.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::DASHBOARD_VIEW,
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::CREDITS_VIEW,
                title: "Credits",
                is_current: active_endpoint == endpoints::CREDITS_VIEW,
            },
            Link {
                url: endpoints::DEBITS_VIEW,
                title: "Debits",
                is_current: active_endpoint == endpoints::DEBITS_VIEW,
            },
            Link {
                url: endpoints::REPORTS_VIEW,
                title: "Reports",
                is_current: active_endpoint == endpoints::REPORTS_VIEW,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
            },
        ];

        NavBar { links }
    }

    /// Render the navigation bar as HTML.
    pub fn into_html(self) -> Markup {
        html! {
            nav class="bg-white border-gray-200 dark:bg-gray-800 mb-4"
            {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a href=(endpoints::DASHBOARD_VIEW) class="flex items-center space-x-3"
                    {
                        span class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Bursary"
                        }
                    }

                    div class="w-full lg:block lg:w-auto"
                    {
                        ul class="font-medium flex flex-col p-4 lg:p-0 mt-4 rounded-lg lg:flex-row lg:space-x-8 lg:mt-0"
                        {
                            @for link in self.links {
                                li { (link.into_html()) }
                            }
                        }
                    }
                }
            }
        }
    }
}
